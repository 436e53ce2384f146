use crate::arc::EndpointArc;
use crate::error::{Result, SvgError};
use crate::path::{Path, Pen};

/// Compiles SVG path data (the `d` attribute) into `path`.
pub fn compile_path_data(d: &str, path: &mut Path) -> Result<()> {
    let mut pen = Pen::new(path, (0.0, 0.0));
    compile_into(d, &mut pen)
}

fn arity(cmd: u8) -> usize {
    match cmd.to_ascii_uppercase() {
        b'M' | b'L' | b'T' => 2,
        b'H' | b'V' => 1,
        b'Q' | b'S' => 4,
        b'C' => 6,
        b'A' => 7,
        _ => 0,
    }
}

fn is_command(b: u8) -> bool {
    matches!(
        b.to_ascii_uppercase(),
        b'M' | b'L' | b'H' | b'V' | b'C' | b'S' | b'Q' | b'T' | b'A' | b'Z'
    )
}

#[derive(Debug, Default)]
struct PathState {
    cur: (f32, f32),
    start: (f32, f32),
    prev_cmd: u8,
    // Second control point of the previous cubic, or control of the previous quad.
    prev_ctrl: Option<(f32, f32)>,
}

impl PathState {
    fn reflected(&self, kinds: [u8; 2]) -> (f32, f32) {
        match self.prev_ctrl {
            Some((px, py)) if kinds.contains(&self.prev_cmd) => {
                (2.0 * self.cur.0 - px, 2.0 * self.cur.1 - py)
            }
            _ => self.cur,
        }
    }
}

pub(crate) fn compile_into(d: &str, pen: &mut Pen<'_>) -> Result<()> {
    let mut scanner = NumberScanner::new(d);
    let mut state = PathState::default();
    let mut first = true;
    let mut args: Vec<f32> = Vec::with_capacity(16);

    loop {
        scanner.skip_separators();
        let Some(b) = scanner.peek() else { break };
        if !is_command(b) {
            return Err(SvgError::MalformedPathData(format!(
                "expected a command at offset {}, found '{}'",
                scanner.offset(),
                b as char
            )));
        }
        if first && !matches!(b, b'M' | b'm') {
            return Err(SvgError::MalformedPathData(
                "path data must begin with a moveto".to_string(),
            ));
        }
        first = false;
        scanner.advance();

        args.clear();
        let n = arity(b);
        loop {
            scanner.skip_separators();
            match scanner.peek() {
                None => break,
                Some(c) if c.is_ascii_alphabetic() => break,
                _ => {}
            }
            let slot = if n == 7 { args.len() % 7 } else { 0 };
            let value = if n == 7 && (slot == 3 || slot == 4) {
                scanner.next_flag()
            } else {
                scanner.next_number()
            };
            let Some(value) = value else {
                return Err(SvgError::MalformedPathData(format!(
                    "invalid number at offset {}",
                    scanner.offset()
                )));
            };
            args.push(value);
        }

        if n == 0 {
            if !args.is_empty() {
                return Err(SvgError::MalformedPathData(format!(
                    "'{}' takes no parameters, got {}",
                    b as char,
                    args.len()
                )));
            }
        } else if args.is_empty() || args.len() % n != 0 {
            return Err(SvgError::MalformedPathData(format!(
                "'{}' expects a multiple of {} parameters, got {}",
                b as char,
                n,
                args.len()
            )));
        }

        execute(b, &args, &mut state, pen);
    }
    Ok(())
}

fn execute(cmd: u8, args: &[f32], st: &mut PathState, pen: &mut Pen<'_>) {
    let rel = cmd.is_ascii_lowercase();
    let upper = cmd.to_ascii_uppercase();
    let abs = |st: &PathState, x: f32, y: f32| {
        if rel {
            (st.cur.0 + x, st.cur.1 + y)
        } else {
            (x, y)
        }
    };

    match upper {
        b'M' => {
            for (i, pair) in args.chunks_exact(2).enumerate() {
                let p = abs(st, pair[0], pair[1]);
                if i == 0 {
                    pen.move_to(p.0, p.1);
                    st.start = p;
                    st.prev_cmd = b'M';
                } else {
                    // Extra pairs after a moveto are implicit linetos.
                    pen.line_to(p.0, p.1);
                    st.prev_cmd = b'L';
                }
                st.cur = p;
                st.prev_ctrl = None;
            }
        }
        b'L' => {
            for pair in args.chunks_exact(2) {
                let p = abs(st, pair[0], pair[1]);
                pen.line_to(p.0, p.1);
                st.cur = p;
            }
            st.prev_ctrl = None;
        }
        b'H' => {
            for &x in args {
                let x = if rel { st.cur.0 + x } else { x };
                pen.line_to(x, st.cur.1);
                st.cur.0 = x;
            }
            st.prev_ctrl = None;
        }
        b'V' => {
            for &y in args {
                let y = if rel { st.cur.1 + y } else { y };
                pen.line_to(st.cur.0, y);
                st.cur.1 = y;
            }
            st.prev_ctrl = None;
        }
        b'Q' => {
            for g in args.chunks_exact(4) {
                let c = abs(st, g[0], g[1]);
                let p = abs(st, g[2], g[3]);
                pen.quad_to(c.0, c.1, p.0, p.1);
                st.prev_ctrl = Some(c);
                st.cur = p;
                st.prev_cmd = b'Q';
            }
        }
        b'T' => {
            for g in args.chunks_exact(2) {
                let c = st.reflected([b'Q', b'T']);
                let p = abs(st, g[0], g[1]);
                pen.quad_to(c.0, c.1, p.0, p.1);
                st.prev_ctrl = Some(c);
                st.cur = p;
                st.prev_cmd = b'T';
            }
        }
        b'C' => {
            for g in args.chunks_exact(6) {
                let c1 = abs(st, g[0], g[1]);
                let c2 = abs(st, g[2], g[3]);
                let p = abs(st, g[4], g[5]);
                pen.cubic_to(c1, c2, p);
                st.prev_ctrl = Some(c2);
                st.cur = p;
                st.prev_cmd = b'C';
            }
        }
        b'S' => {
            for g in args.chunks_exact(4) {
                let c1 = st.reflected([b'C', b'S']);
                let c2 = abs(st, g[0], g[1]);
                let p = abs(st, g[2], g[3]);
                pen.cubic_to(c1, c2, p);
                st.prev_ctrl = Some(c2);
                st.cur = p;
                st.prev_cmd = b'S';
            }
        }
        b'A' => {
            for g in args.chunks_exact(7) {
                let p = abs(st, g[5], g[6]);
                let arc = EndpointArc {
                    from: st.cur,
                    to: p,
                    rx: g[0],
                    ry: g[1],
                    x_axis_rotation: g[2].to_radians(),
                    large_arc: g[3] != 0.0,
                    sweep: g[4] != 0.0,
                };
                if arc.from != arc.to {
                    if arc.to_center().is_some() {
                        for c in arc.to_cubics() {
                            pen.cubic_to(c.c1, c.c2, c.to);
                        }
                    } else {
                        pen.line_to(p.0, p.1);
                    }
                }
                st.cur = p;
            }
            st.prev_ctrl = None;
        }
        b'Z' => {
            pen.close();
            st.cur = st.start;
            st.prev_ctrl = None;
        }
        _ => {}
    }
    if !matches!(upper, b'M' | b'Q' | b'T' | b'C' | b'S') {
        st.prev_cmd = upper;
    }
}

// Scanner for SVG number lists: whitespace/comma separated, with a sign or a
// second decimal point starting a new number.
pub(crate) struct NumberScanner<'a> {
    bytes: &'a [u8],
    i: usize,
}

impl<'a> NumberScanner<'a> {
    pub(crate) fn new(input: &'a str) -> Self {
        Self {
            bytes: input.as_bytes(),
            i: 0,
        }
    }

    pub(crate) fn offset(&self) -> usize {
        self.i
    }

    pub(crate) fn peek(&self) -> Option<u8> {
        self.bytes.get(self.i).copied()
    }

    fn advance(&mut self) {
        self.i += 1;
    }

    // Consumes `b` if it is the next byte.
    pub(crate) fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.i += 1;
            true
        } else {
            false
        }
    }

    pub(crate) fn at_end(&mut self) -> bool {
        self.skip_separators();
        self.i >= self.bytes.len()
    }

    pub(crate) fn skip_separators(&mut self) {
        while let Some(b) = self.peek() {
            if b.is_ascii_whitespace() || b == b',' {
                self.i += 1;
            } else {
                break;
            }
        }
    }

    pub(crate) fn next_number(&mut self) -> Option<f32> {
        self.skip_separators();
        let start = self.i;
        let mut digits = false;

        if matches!(self.peek(), Some(b'+' | b'-')) {
            self.i += 1;
        }
        while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
            self.i += 1;
            digits = true;
        }
        if self.peek() == Some(b'.') {
            self.i += 1;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.i += 1;
                digits = true;
            }
        }
        if !digits {
            self.i = start;
            return None;
        }
        if matches!(self.peek(), Some(b'e' | b'E')) {
            let mark = self.i;
            self.i += 1;
            if matches!(self.peek(), Some(b'+' | b'-')) {
                self.i += 1;
            }
            let mut exp_digits = false;
            while matches!(self.peek(), Some(b) if b.is_ascii_digit()) {
                self.i += 1;
                exp_digits = true;
            }
            if !exp_digits {
                self.i = mark;
            }
        }

        let s = std::str::from_utf8(&self.bytes[start..self.i]).ok()?;
        s.parse::<f32>().ok()
    }

    // Arc flags may be written without separators (`01`).
    pub(crate) fn next_flag(&mut self) -> Option<f32> {
        self.skip_separators();
        match self.peek()? {
            b'0' => {
                self.i += 1;
                Some(0.0)
            }
            b'1' => {
                self.i += 1;
                Some(1.0)
            }
            _ => None,
        }
    }
}

// Parses a separator-delimited number list; `None` on any stray token.
pub(crate) fn parse_number_list(input: &str) -> Option<Vec<f32>> {
    let mut scanner = NumberScanner::new(input);
    let mut out = Vec::new();
    while !scanner.at_end() {
        out.push(scanner.next_number()?);
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::PathOp;
    use crate::types::Point;

    fn compile(d: &str) -> Path {
        let mut path = Path::new();
        compile_path_data(d, &mut path).unwrap();
        path
    }

    fn end_point(op: &PathOp) -> Option<Point> {
        match *op {
            PathOp::MoveTo(p) | PathOp::LineTo(p) | PathOp::QuadTo(_, p) => Some(p),
            PathOp::CubicTo(_, _, p) => Some(p),
            PathOp::Close => None,
        }
    }

    #[test]
    fn compiles_closed_triangle() {
        let path = compile("M0,0 L10,0 L10,10 Z");
        assert_eq!(
            path.ops(),
            &[
                PathOp::MoveTo(Point::new(0.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 0.0)),
                PathOp::LineTo(Point::new(10.0, 10.0)),
                PathOp::Close,
            ]
        );
    }

    #[test]
    fn relative_commands_accumulate() {
        let path = compile("m1 1 l2 0 0 2 h-2 v-2 z l5 5");
        let ends: Vec<Point> = path.ops().iter().filter_map(end_point).collect();
        assert_eq!(
            ends,
            vec![
                Point::new(1.0, 1.0),
                Point::new(3.0, 1.0),
                Point::new(3.0, 3.0),
                Point::new(1.0, 3.0),
                Point::new(1.0, 1.0),
                Point::new(6.0, 6.0),
            ]
        );
    }

    #[test]
    fn extra_moveto_pairs_are_lines() {
        let path = compile("M0 0 10 0 10 10");
        assert!(matches!(path.ops()[1], PathOp::LineTo(_)));
        assert!(matches!(path.ops()[2], PathOp::LineTo(_)));
    }

    #[test]
    fn numbers_split_on_sign_and_second_dot() {
        let path = compile("M.5.5L-1-2e1");
        assert_eq!(
            path.ops(),
            &[
                PathOp::MoveTo(Point::new(0.5, 0.5)),
                PathOp::LineTo(Point::new(-1.0, -20.0)),
            ]
        );
    }

    #[test]
    fn smooth_quad_reflects_only_after_quad() {
        let path = compile("M0 0 Q5 5 10 0 T20 0");
        assert_eq!(
            path.ops()[2],
            PathOp::QuadTo(Point::new(15.0, -5.0), Point::new(20.0, 0.0))
        );
        let path = compile("M0 0 L10 0 T20 0");
        assert_eq!(
            path.ops()[2],
            PathOp::QuadTo(Point::new(10.0, 0.0), Point::new(20.0, 0.0))
        );
    }

    #[test]
    fn smooth_cubic_reflects_after_relative_cubic() {
        let path = compile("M0 0 c0 5 10 5 10 0 s10 -5 10 0");
        assert_eq!(
            path.ops()[2],
            PathOp::CubicTo(
                Point::new(10.0, -5.0),
                Point::new(20.0, -5.0),
                Point::new(20.0, 0.0)
            )
        );
        let path = compile("M0 0 Q1 1 2 0 S4 1 6 0");
        assert_eq!(
            path.ops()[2],
            PathOp::CubicTo(
                Point::new(2.0, 0.0),
                Point::new(4.0, 1.0),
                Point::new(6.0, 0.0)
            )
        );
    }

    #[test]
    fn smooth_segments_chain() {
        let path = compile("M0 0 Q5 5 10 0 T20 0 T30 0");
        assert_eq!(
            path.ops()[3],
            PathOp::QuadTo(Point::new(25.0, 5.0), Point::new(30.0, 0.0))
        );
        let path = compile("M0 0 q5 5 10 0 t10 0");
        assert_eq!(
            path.ops()[2],
            PathOp::QuadTo(Point::new(15.0, -5.0), Point::new(20.0, 0.0))
        );
        let path = compile("M0 0 C0 5 10 5 10 0 S20 -5 20 0 S30 5 30 0");
        assert_eq!(
            path.ops()[3],
            PathOp::CubicTo(
                Point::new(20.0, 5.0),
                Point::new(30.0, 5.0),
                Point::new(30.0, 0.0)
            )
        );
    }

    #[test]
    fn arc_endpoints_match() {
        let path = compile("M0,0 A5,5 0 0,1 10,0");
        let ops = path.ops();
        assert_eq!(ops[0], PathOp::MoveTo(Point::new(0.0, 0.0)));
        assert_eq!(end_point(ops.last().unwrap()), Some(Point::new(10.0, 0.0)));
        for op in &ops[1..] {
            let PathOp::CubicTo(c1, c2, p) = *op else {
                panic!("expected cubic, got {op:?}");
            };
            for q in [c1, c2, p] {
                let (x, y) = q.to_f32();
                let r = ((x - 5.0).powi(2) + y.powi(2)).sqrt();
                assert!(r <= 5.1, "control point outside circle: {q:?}");
            }
        }
    }

    #[test]
    fn compact_arc_flags() {
        let path = compile("M10 10a5 5 0 0110 0");
        assert_eq!(
            end_point(path.ops().last().unwrap()),
            Some(Point::new(20.0, 10.0))
        );
    }

    #[test]
    fn zero_radius_arc_is_a_line() {
        let path = compile("M0 0 A0 5 0 0 1 10 0");
        assert_eq!(path.ops()[1], PathOp::LineTo(Point::new(10.0, 0.0)));
    }

    #[test]
    fn bad_arity_is_rejected() {
        let mut path = Path::new();
        for d in ["M0 0 L1", "M0 0 C1 2 3 4 5", "M", "M0 0 Z 1", "L1 1", "M0 0 X5"] {
            assert!(
                matches!(
                    compile_path_data(d, &mut path),
                    Err(SvgError::MalformedPathData(_))
                ),
                "{d}"
            );
        }
    }

    #[test]
    fn text_form_round_trips() {
        let path = compile("M1.3,2 q3 4 5.1 6 t2 2 C1 1 2 2 3 3 s1 1 2 2 a4 3 20 1 0 5 5 Z");
        let again = compile(&path.to_string());
        assert_eq!(path, again);
    }

    #[test]
    fn number_list_rejects_junk() {
        assert_eq!(parse_number_list("1, 2 3"), Some(vec![1.0, 2.0, 3.0]));
        assert_eq!(parse_number_list(" "), Some(vec![]));
        assert_eq!(parse_number_list("1 x"), None);
    }
}
