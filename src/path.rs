//! The interpreter for the SVG path mini-language.
//!
//! A path's `d` attribute is a stream of single-letter commands with packed
//! numeric arguments. The interpreter walks it with a small state machine,
//! flattening every curve command through [`crate::curve`], and produces one
//! [`Primitive`] per `M`/`m` group. Errors are local: parsing of the
//! offending attribute stops, but primitives finished before the error are
//! kept and returned, so one bad path never aborts a whole document.

use crate::curve;
use crate::geom::{Point, EPS};
use crate::primitive::Primitive;

/// Tokenizer state for the path grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParserState {
    /// Nothing consumed yet; the first command must be a moveto.
    Start,
    /// The last token was a complete number.
    Number,
    /// The last token was a comma (only legal right after a number).
    Comma,
    /// A command was just dispatched.
    Command,
    /// Terminal; the rest of this attribute is discarded.
    Error,
}

/// A diagnostic for a malformed `d` attribute.
///
/// Carried back to the caller for logging; the primitives parsed before the
/// error are still returned alongside.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathError {
    /// The command being processed when the error was found, if any.
    pub command: Option<char>,
    /// What went wrong.
    pub reason: &'static str,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.command {
            Some(c) => write!(f, "in path command {c:?}: {}", self.reason),
            None => write!(f, "in path data: {}", self.reason),
        }
    }
}

/// The state the command handlers thread through: pen position plus the
/// control-point memory that resolves smooth curve commands.
#[derive(Clone, Copy, Debug)]
struct PathState {
    /// Current pen position.
    cur: Point,
    /// Last control point of the previous curve command.
    ctrl: Point,
    /// The previous command letter; smooth commands reflect `ctrl` only when
    /// this names a compatible curve family.
    last_cmd: u8,
}

struct Interpreter {
    tolerance: f64,
    state: ParserState,
    st: PathState,
    prim: Option<Primitive>,
    out: Vec<Primitive>,
    error: Option<PathError>,
}

/// Interprets a path `d` attribute into primitives.
///
/// Curve commands are flattened with the accuracy-driven sampler at
/// `tolerance`; a non-positive tolerance is replaced by `1.0` with a
/// diagnostic, matching the permissive construction-time rule. The returned
/// error, if any, describes why parsing stopped early; everything parsed
/// before that point is still in the primitive list.
pub fn parse_path(d: &str, tolerance: f64) -> (Vec<Primitive>, Option<PathError>) {
    let tolerance = if tolerance > 0.0 && tolerance.is_finite() {
        tolerance
    } else {
        log::warn!("invalid path tolerance {tolerance}, using 1.0");
        1.0
    };
    let mut interp = Interpreter {
        tolerance,
        state: ParserState::Start,
        st: PathState {
            cur: Point::new(0.0, 0.0),
            ctrl: Point::new(0.0, 0.0),
            last_cmd: 0,
        },
        prim: None,
        out: Vec::new(),
        error: None,
    };
    interp.run(d);
    (interp.out, interp.error)
}

/// Longest-valid-prefix float scan, strtod-style: `1.5.5` scans as `1.5`
/// leaving `.5`, and an exponent is only consumed when complete.
fn scan_number(s: &str) -> Option<(f64, usize)> {
    let b = s.as_bytes();
    let mut i = 0;
    if i < b.len() && (b[i] == b'+' || b[i] == b'-') {
        i += 1;
    }
    let int_start = i;
    while i < b.len() && b[i].is_ascii_digit() {
        i += 1;
    }
    let int_digits = i - int_start;
    let mut frac_digits = 0;
    if i < b.len() && b[i] == b'.' {
        i += 1;
        let frac_start = i;
        while i < b.len() && b[i].is_ascii_digit() {
            i += 1;
        }
        frac_digits = i - frac_start;
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }
    if i < b.len() && (b[i] == b'e' || b[i] == b'E') {
        let mut k = i + 1;
        if k < b.len() && (b[k] == b'+' || b[k] == b'-') {
            k += 1;
        }
        let exp_start = k;
        while k < b.len() && b[k].is_ascii_digit() {
            k += 1;
        }
        if k > exp_start {
            i = k;
        }
    }
    s[..i].parse().ok().map(|v| (v, i))
}

impl Interpreter {
    fn fail(&mut self, command: Option<char>, reason: &'static str) {
        self.state = ParserState::Error;
        if self.error.is_none() {
            self.error = Some(PathError { command, reason });
        }
    }

    /// Attributes a pending diagnostic to the command being processed.
    fn attribute_error(&mut self, command: char) {
        if let Some(err) = self.error.as_mut() {
            if err.command.is_none() {
                err.command = Some(command);
            }
        }
    }

    /// Finishes the current primitive: non-empty ones go to the output list,
    /// empty ones are dropped.
    fn finalize(&mut self) {
        if let Some(prim) = self.prim.take() {
            if !prim.is_empty() {
                self.out.push(prim);
            }
        }
    }

    fn prim(&mut self) -> &mut Primitive {
        // A moveto always runs first (enforced by the Start state), so the
        // primitive exists by the time any drawing command is dispatched.
        self.prim.as_mut().expect("moveto runs before drawing commands")
    }

    fn flatten(&mut self, ctrl: &[Point]) {
        let pts = curve::flatten_adaptive(ctrl, self.tolerance)
            .expect("tolerance is validated at construction");
        let prim = self.prim();
        for p in pts {
            prim.push(p);
        }
    }

    /// Scans the argument list following a command letter, mimicking the
    /// grammar exactly: whitespace is free, a comma is only legal directly
    /// after a number, and anything that is not part of a number is an error.
    /// Stops at the next command letter. Returns the numbers and the byte
    /// count consumed.
    fn scan_args(&mut self, s: &str) -> (Vec<f64>, usize) {
        let bytes = s.as_bytes();
        let mut nums = Vec::new();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c.is_ascii_alphabetic() {
                break;
            }
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            if c.is_ascii_digit() || c == b'.' || c == b'-' || c == b'+' {
                match scan_number(&s[i..]) {
                    Some((v, used)) => {
                        i += used;
                        self.state = ParserState::Number;
                        nums.push(v);
                    }
                    None => {
                        self.fail(None, "malformed number");
                        break;
                    }
                }
            } else if c == b',' {
                if self.state != ParserState::Number {
                    self.fail(None, "comma without a preceding number");
                    break;
                }
                self.state = ParserState::Comma;
                i += 1;
            } else {
                self.fail(None, "unexpected character in arguments");
                break;
            }
        }
        (nums, i)
    }

    fn run(&mut self, d: &str) {
        let bytes = d.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            let c = bytes[i];
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            if !c.is_ascii_alphabetic() {
                self.fail(None, "expected a command letter");
                break;
            }
            let command = c as char;
            if self.state == ParserState::Start && command != 'M' && command != 'm' {
                self.fail(Some(command), "path must start with a moveto");
                break;
            }

            let (nums, used) = self.scan_args(&d[i + 1..]);
            i += 1 + used;
            if self.state == ParserState::Error {
                self.attribute_error(command);
                break;
            }

            match command {
                'M' | 'm' => self.moveto(&nums, command == 'm'),
                'L' | 'l' => self.lineto(&nums, command == 'l'),
                'H' | 'h' => self.horizontal(&nums, command == 'h'),
                'V' | 'v' => self.vertical(&nums, command == 'v'),
                'Z' | 'z' => self.closepath(&nums),
                'C' | 'c' => self.cubic(&nums, command == 'c'),
                'S' | 's' => self.smooth_cubic(&nums, command == 's'),
                'Q' | 'q' => self.quadratic(&nums, command == 'q'),
                'T' | 't' => self.smooth_quadratic(&nums, command == 't'),
                'A' | 'a' => self.arc(&nums, command == 'a'),
                _ => self.fail(Some(command), "unknown command"),
            }
            self.attribute_error(command);
            if self.state == ParserState::Error {
                break;
            }
            self.state = ParserState::Command;
            self.st.last_cmd = c;
        }
        self.finalize();
    }

    fn moveto(&mut self, nums: &[f64], relative: bool) {
        self.finalize();
        if nums.len() < 2 {
            self.prim = Some(Primitive::new(self.st.cur));
            self.fail(None, "moveto needs at least one coordinate pair");
            return;
        }
        if relative {
            self.st.cur += Point::new(nums[0], nums[1]);
        } else {
            self.st.cur = Point::new(nums[0], nums[1]);
        }
        self.prim = Some(Primitive::new(self.st.cur));
        // Remaining pairs are implicit linetos.
        self.lineto(&nums[2..], relative);
    }

    fn lineto(&mut self, nums: &[f64], relative: bool) {
        let mut chunks = nums.chunks_exact(2);
        for pair in &mut chunks {
            let p = Point::new(pair[0], pair[1]);
            self.st.cur = if relative { self.st.cur + p } else { p };
            let cur = self.st.cur;
            self.prim().push(cur);
        }
        if !chunks.remainder().is_empty() {
            self.fail(None, "dangling coordinate");
        }
    }

    fn horizontal(&mut self, nums: &[f64], relative: bool) {
        if nums.is_empty() {
            self.fail(None, "missing coordinate");
            return;
        }
        for &x in nums {
            self.st.cur.x = if relative { self.st.cur.x + x } else { x };
            let cur = self.st.cur;
            self.prim().push(cur);
        }
    }

    fn vertical(&mut self, nums: &[f64], relative: bool) {
        if nums.is_empty() {
            self.fail(None, "missing coordinate");
            return;
        }
        for &y in nums {
            self.st.cur.y = if relative { self.st.cur.y + y } else { y };
            let cur = self.st.cur;
            self.prim().push(cur);
        }
    }

    fn closepath(&mut self, nums: &[f64]) {
        let start = self.prim().start;
        self.st.cur = start;
        self.prim().push(start);
        if !nums.is_empty() {
            self.fail(None, "closepath takes no arguments");
        }
    }

    fn cubic(&mut self, nums: &[f64], relative: bool) {
        let mut chunks = nums.chunks_exact(6);
        for args in &mut chunks {
            let base = if relative {
                self.st.cur
            } else {
                Point::new(0.0, 0.0)
            };
            let p0 = self.st.cur;
            let p1 = base + Point::new(args[0], args[1]);
            let p2 = base + Point::new(args[2], args[3]);
            let p3 = base + Point::new(args[4], args[5]);
            self.st.ctrl = p2;
            self.st.cur = p3;
            if !degenerate(&[p0, p1, p2, p3]) {
                self.flatten(&[p0, p1, p2, p3]);
            }
        }
        if !chunks.remainder().is_empty() {
            self.fail(None, "incomplete control-point group");
        }
    }

    fn smooth_cubic(&mut self, nums: &[f64], relative: bool) {
        let mut chunks = nums.chunks_exact(4);
        for args in &mut chunks {
            let base = if relative {
                self.st.cur
            } else {
                Point::new(0.0, 0.0)
            };
            let p0 = self.st.cur;
            let p1 = if matches!(self.st.last_cmd, b'c' | b'C' | b's' | b'S') {
                p0 * 2.0 - self.st.ctrl
            } else {
                p0
            };
            // Later groups of the same command always reflect.
            self.st.last_cmd = b'S';
            let p2 = base + Point::new(args[0], args[1]);
            let p3 = base + Point::new(args[2], args[3]);
            self.st.ctrl = p2;
            self.st.cur = p3;
            if !degenerate(&[p0, p1, p2, p3]) {
                self.flatten(&[p0, p1, p2, p3]);
            }
        }
        if !chunks.remainder().is_empty() {
            self.fail(None, "incomplete control-point group");
        }
    }

    fn quadratic(&mut self, nums: &[f64], relative: bool) {
        let mut chunks = nums.chunks_exact(4);
        for args in &mut chunks {
            let base = if relative {
                self.st.cur
            } else {
                Point::new(0.0, 0.0)
            };
            let p0 = self.st.cur;
            let p1 = base + Point::new(args[0], args[1]);
            let p2 = base + Point::new(args[2], args[3]);
            self.st.ctrl = p1;
            self.st.cur = p2;
            if !degenerate(&[p0, p1, p2]) {
                self.flatten(&[p0, p1, p2]);
            }
        }
        if !chunks.remainder().is_empty() {
            self.fail(None, "incomplete control-point group");
        }
    }

    fn smooth_quadratic(&mut self, nums: &[f64], relative: bool) {
        let mut chunks = nums.chunks_exact(2);
        for args in &mut chunks {
            let p0 = self.st.cur;
            let p1 = if matches!(self.st.last_cmd, b'q' | b'Q' | b't' | b'T') {
                p0 * 2.0 - self.st.ctrl
            } else {
                p0
            };
            self.st.last_cmd = b'T';
            let p2 = if relative {
                p0 + Point::new(args[0], args[1])
            } else {
                Point::new(args[0], args[1])
            };
            self.st.ctrl = p1;
            self.st.cur = p2;
            if !degenerate(&[p0, p1, p2]) {
                self.flatten(&[p0, p1, p2]);
            }
        }
        if !chunks.remainder().is_empty() {
            self.fail(None, "dangling coordinate");
        }
    }

    fn arc(&mut self, nums: &[f64], relative: bool) {
        let mut chunks = nums.chunks_exact(7);
        for args in &mut chunks {
            let (rx, ry, rot) = (args[0], args[1], args[2]);
            let (laf, sf) = (args[3], args[4]);
            let (x, y) = (args[5], args[6]);
            if (laf != 0.0 && laf != 1.0) || (sf != 0.0 && sf != 1.0) {
                self.fail(None, "arc flags must be 0 or 1");
                return;
            }
            let from = self.st.cur;
            let to = if relative {
                from + Point::new(x, y)
            } else {
                Point::new(x, y)
            };
            self.st.cur = to;
            let (rx, ry) = (rx.abs(), ry.abs());
            if rx < EPS || ry < EPS {
                // Zero radius degenerates to a straight line.
                self.prim().push(to);
                continue;
            }
            let pts = curve::flatten_arc(from, to, rx, ry, rot, laf == 1.0, sf == 1.0, self.tolerance)
                .expect("tolerance is validated at construction");
            let prim = self.prim();
            for p in pts {
                prim.push(p);
            }
        }
        if !chunks.remainder().is_empty() {
            self.fail(None, "incomplete arc argument group");
        }
    }
}

/// True when all control points coincide, so flattening would only produce
/// zero-length segments.
fn degenerate(ctrl: &[Point]) -> bool {
    ctrl.windows(2).all(|w| w[0].dist2(&w[1]) == 0.0)
}
