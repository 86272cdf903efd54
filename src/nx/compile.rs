//! The NX compiler: a recursive-descent parser that compiles directly to
//! the state array, Thompson-construction style.
//!
//! There is no separate AST: each parse function returns a [`Frag`], a
//! partially-built chunk of the state array together with a list of
//! "patch slots" — exit points whose destination isn't known yet. This is
//! the same backpatching technique `BurntSushi-rsc-regexp`'s
//! `idiomatic-translation/nfa.rs` uses for its postfix Thompson
//! construction, adapted here to recursive descent over the grammar
//! directly (no postfix conversion step).
//!
//! ```text
//! expr      := alt
//! alt       := seq ('|' seq)*
//! seq       := atom+
//! atom      := group | class | literal | anchor | quant
//! group     := '(' expr ')'
//! class     := '.' | '[' '^'? range+ ']' | '\' escape
//! quant     := atom ('?' | '*' | '+' | '{' N [',' [M]] '}')
//! ```

use crate::alphabet::{CharClass, Symbol};
use crate::diagnostics::{Diagnostics, Level};
use crate::error::{CapacityKind, Error};
use crate::nx::inst::{NxState, StateId, UNPATCHED};
use crate::nx::program::{CompileFlags, Nx, MAX_K_MAX, MAX_STATES};

/// Compiles a pattern expression into an immutable [`Nx`] program.
pub fn compile(expr: &str, flags: CompileFlags, diag: &mut Diagnostics) -> Result<Nx, Error> {
    if flags.k_max > MAX_K_MAX {
        return Err(Error::Capacity { kind: CapacityKind::FuzzBudget });
    }
    let bytes = expr.as_bytes();
    let mut c = Compiler { flags, states: Vec::new() };

    let mut pos = 0usize;
    let body = c.parse_alt(bytes, &mut pos)?;
    if pos != bytes.len() {
        return Err(Error::compile(pos, format!("unexpected '{}'", bytes[pos] as char)));
    }

    // Implicit wrap: every pattern is matched as if written
    // `_.*<body>.*_`, so that it can anchor anywhere inside a (possibly
    // multi-word) canonical stream while still requiring the whole
    // canonical string, word-boundary markers included, to be consumed.
    let leading_boundary = c.literal(Symbol::from_byte(b'_').unwrap())?;
    let leading_slack = c.dot_star()?;
    let trailing_slack = c.dot_star()?;
    let trailing_boundary = c.literal(Symbol::from_byte(b'_').unwrap())?;

    let prefix = c.concat(leading_boundary, leading_slack)?;
    let prefix = c.concat(prefix, body)?;
    let suffix = c.concat(trailing_slack, trailing_boundary)?;
    let wrapped = c.concat(prefix, suffix)?;

    let accept = c.alloc(NxState::Accept)?;
    c.patch(&wrapped.out, accept);

    diag.record(Level::Debug, format!("compiled '{expr}' to {} states", c.states.len()));

    Ok(Nx { states: c.states, start: wrapped.start, original: expr.to_string(), flags })
}

/// One exit point of a [`Frag`] awaiting a destination state.
#[derive(Clone, Copy, Debug)]
enum PatchSlot {
    CharNext(StateId),
    JumpNext(StateId),
    SplitB(StateId),
    AnchorStartNext(StateId),
    AnchorEndNext(StateId),
}

/// A partially compiled fragment of the state array: a single entry point
/// (`start`) and a list of not-yet-patched exit points (`out`).
struct Frag {
    start: StateId,
    out: Vec<PatchSlot>,
}

struct Compiler {
    flags: CompileFlags,
    states: Vec<NxState>,
}

impl Compiler {
    fn alloc(&mut self, state: NxState) -> Result<StateId, Error> {
        if self.states.len() >= MAX_STATES {
            return Err(Error::Capacity { kind: CapacityKind::States });
        }
        let id = self.states.len() as StateId;
        self.states.push(state);
        Ok(id)
    }

    fn patch(&mut self, slots: &[PatchSlot], target: StateId) {
        for &slot in slots {
            match slot {
                PatchSlot::CharNext(id) => {
                    if let NxState::Char { next, .. } = &mut self.states[id as usize] {
                        *next = target;
                    }
                }
                PatchSlot::JumpNext(id) => {
                    if let NxState::Jump { next } = &mut self.states[id as usize] {
                        *next = target;
                    }
                }
                PatchSlot::SplitB(id) => {
                    if let NxState::Split { b, .. } = &mut self.states[id as usize] {
                        *b = target;
                    }
                }
                PatchSlot::AnchorStartNext(id) => {
                    if let NxState::AnchorStart { next } = &mut self.states[id as usize] {
                        *next = target;
                    }
                }
                PatchSlot::AnchorEndNext(id) => {
                    if let NxState::AnchorEnd { next } = &mut self.states[id as usize] {
                        *next = target;
                    }
                }
            }
        }
    }

    /// A single atom that consumes one symbol matching `class`.
    fn class_atom(&mut self, class: CharClass) -> Result<Frag, Error> {
        let id = self.alloc(NxState::placeholder_char(class))?;
        Ok(Frag { start: id, out: vec![PatchSlot::CharNext(id)] })
    }

    fn literal(&mut self, sym: Symbol) -> Result<Frag, Error> {
        self.class_atom(CharClass::single(sym))
    }

    /// A zero-width fragment that does nothing: an identity element for
    /// concatenation, and the compiled form of `{0,0}`.
    fn epsilon(&mut self) -> Result<Frag, Error> {
        let id = self.alloc(NxState::placeholder_jump())?;
        Ok(Frag { start: id, out: vec![PatchSlot::JumpNext(id)] })
    }

    /// `.*` over the full 28-symbol alphabet, used for the implicit wrap
    /// (not the user-facing `.`, which is flag-gated — see `dot_class`).
    fn dot_star(&mut self) -> Result<Frag, Error> {
        let body = self.class_atom(CharClass::all_symbols())?;
        Ok(self.quantify_star(body))
    }

    fn concat(&mut self, a: Frag, b: Frag) -> Result<Frag, Error> {
        self.patch(&a.out, b.start);
        Ok(Frag { start: a.start, out: b.out })
    }

    fn alternate(&mut self, a: Frag, b: Frag) -> Result<Frag, Error> {
        let split = self.alloc(NxState::placeholder_split(a.start, b.start))?;
        let mut out = a.out;
        out.extend(b.out);
        Ok(Frag { start: split, out })
    }

    fn quantify_optional(&mut self, body: Frag) -> Frag {
        let split_id = self.states.len() as StateId;
        self.states.push(NxState::placeholder_split(body.start, UNPATCHED));
        let mut out = body.out;
        out.push(PatchSlot::SplitB(split_id));
        Frag { start: split_id, out }
    }

    fn quantify_star(&mut self, body: Frag) -> Frag {
        let split_id = self.states.len() as StateId;
        self.states.push(NxState::placeholder_split(body.start, UNPATCHED));
        self.patch(&body.out, split_id);
        Frag { start: split_id, out: vec![PatchSlot::SplitB(split_id)] }
    }

    fn quantify_plus(&mut self, body: Frag) -> Frag {
        let split_id = self.states.len() as StateId;
        self.states.push(NxState::placeholder_split(body.start, UNPATCHED));
        self.patch(&body.out, split_id);
        Frag { start: body.start, out: vec![PatchSlot::SplitB(split_id)] }
    }

    // -- grammar --------------------------------------------------------

    fn parse_alt(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Frag, Error> {
        let mut frag = self.parse_seq(bytes, pos)?;
        while bytes.get(*pos) == Some(&b'|') {
            *pos += 1;
            let rhs = self.parse_seq(bytes, pos)?;
            frag = self.alternate(frag, rhs)?;
        }
        Ok(frag)
    }

    fn parse_seq(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Frag, Error> {
        let mut frag: Option<Frag> = None;
        while let Some(&b) = bytes.get(*pos) {
            if b == b'|' || b == b')' {
                break;
            }
            let atom = self.parse_atom(bytes, pos)?;
            frag = Some(match frag {
                None => atom,
                Some(prev) => self.concat(prev, atom)?,
            });
        }
        frag.ok_or_else(|| Error::compile(*pos, "empty alternation"))
    }

    fn parse_atom(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Frag, Error> {
        let atom_start = *pos;
        let snapshot = self.states.len();
        let base = self.parse_base_atom(bytes, pos)?;
        match bytes.get(*pos).copied() {
            Some(b'?') => {
                *pos += 1;
                Ok(self.quantify_optional(base))
            }
            Some(b'*') => {
                *pos += 1;
                Ok(self.quantify_star(base))
            }
            Some(b'+') => {
                *pos += 1;
                Ok(self.quantify_plus(base))
            }
            Some(b'{') => {
                *pos += 1;
                let (n, m) = self.parse_counted_spec(bytes, pos)?;
                // `quantify_counted` re-parses the base atom's span itself
                // (one fresh copy per repetition), so the eager `base`
                // parsed above to find this `{` is never used. Drop its
                // states rather than leave them allocated and unreachable
                // from `start` — they'd still count against `MAX_STATES`.
                self.states.truncate(snapshot);
                self.quantify_counted(bytes, atom_start, n, m)
            }
            _ => Ok(base),
        }
    }

    fn parse_base_atom(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Frag, Error> {
        let b = *bytes.get(*pos).ok_or_else(|| Error::compile(*pos, "unexpected end of pattern"))?;
        match b {
            b'(' => {
                *pos += 1;
                let inner = self.parse_alt(bytes, pos)?;
                if bytes.get(*pos) != Some(&b')') {
                    return Err(Error::compile(*pos, "unbalanced brackets"));
                }
                *pos += 1;
                Ok(inner)
            }
            b'.' => {
                *pos += 1;
                self.class_atom(self.dot_class())
            }
            b'[' => self.parse_class(bytes, pos),
            b'\\' => self.parse_escape(bytes, pos),
            b'^' => {
                *pos += 1;
                let id = self.alloc(NxState::placeholder_anchor_start())?;
                Ok(Frag { start: id, out: vec![PatchSlot::AnchorStartNext(id)] })
            }
            b'$' => {
                *pos += 1;
                let id = self.alloc(NxState::placeholder_anchor_end())?;
                Ok(Frag { start: id, out: vec![PatchSlot::AnchorEndNext(id)] })
            }
            _ => {
                *pos += 1;
                self.literal_byte(b)
            }
        }
    }

    /// Compiles a raw byte as a literal atom. Letters fold case; `_` and
    /// `'` match themselves; any byte with no alphabet symbol (stray
    /// punctuation, digits) compiles to a class that can never match,
    /// since it can never appear in a canonical string either way.
    fn literal_byte(&mut self, b: u8) -> Result<Frag, Error> {
        match Symbol::from_byte(b) {
            Some(sym) => self.literal(sym),
            None => self.class_atom(CharClass::EMPTY),
        }
    }

    fn dot_class(&self) -> CharClass {
        let mut class = CharClass::all_letters();
        if !self.flags.explicit_space {
            class = class.with(Symbol::from_byte(b'_').unwrap());
        }
        if !self.flags.explicit_punct {
            class = class.with(Symbol::from_byte(b'\'').unwrap());
        }
        class
    }

    fn parse_escape(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Frag, Error> {
        *pos += 1; // consume backslash
        let b = *bytes.get(*pos).ok_or_else(|| Error::compile(*pos, "trailing backslash"))?;
        *pos += 1;
        match b {
            b'w' => self.class_atom(CharClass::all_letters()),
            b'.' | b'[' | b']' | b'(' | b')' | b'|' | b'?' | b'*' | b'+' | b'{' | b'}' | b'\\'
            | b'_' | b'\'' => self.literal_byte(b),
            _ => Err(Error::compile(*pos - 2, format!("unknown escape '\\{}'", b as char))),
        }
    }

    fn parse_class(&mut self, bytes: &[u8], pos: &mut usize) -> Result<Frag, Error> {
        let start = *pos;
        *pos += 1; // consume '['
        let negate = bytes.get(*pos) == Some(&b'^');
        if negate {
            *pos += 1;
        }
        let mut class = CharClass::EMPTY;
        let mut saw_any = false;
        loop {
            match bytes.get(*pos).copied() {
                None => return Err(Error::compile(start, "unbalanced brackets")),
                Some(b']') if saw_any => {
                    *pos += 1;
                    break;
                }
                Some(b']') => return Err(Error::compile(start, "empty character class")),
                Some(b'\\') => {
                    *pos += 1;
                    let b = *bytes
                        .get(*pos)
                        .ok_or_else(|| Error::compile(*pos, "trailing backslash in class"))?;
                    *pos += 1;
                    match b {
                        b'w' => class = class.union(CharClass::all_letters()),
                        b'.' | b'[' | b']' | b'(' | b')' | b'|' | b'?' | b'*' | b'+' | b'{'
                        | b'}' | b'\\' | b'_' | b'\'' | b'-' | b'^' => {
                            if let Some(sym) = Symbol::from_byte(b) {
                                class = class.with(sym);
                            }
                        }
                        _ => return Err(Error::compile(*pos - 2, format!("unknown escape '\\{}'", b as char))),
                    }
                    saw_any = true;
                }
                Some(lo_byte) => {
                    *pos += 1;
                    if bytes.get(*pos) == Some(&b'-') && bytes.get(*pos + 1) != Some(&b']') {
                        let (Some(lo), Some(hi)) =
                            (Symbol::from_byte(lo_byte), bytes.get(*pos + 1).copied().and_then(Symbol::from_byte))
                        else {
                            return Err(Error::compile(*pos, "invalid range endpoint"));
                        };
                        if hi.bit() < lo.bit() {
                            return Err(Error::compile(*pos, "inverted range"));
                        }
                        class = class.union(CharClass::EMPTY.with_letter_range(lo, hi));
                        *pos += 2;
                    } else if let Some(sym) = Symbol::from_byte(lo_byte) {
                        class = class.with(sym);
                    }
                    saw_any = true;
                }
            }
        }
        if negate {
            class = class.negate();
        }
        self.class_atom(class)
    }

    fn parse_counted_spec(&mut self, bytes: &[u8], pos: &mut usize) -> Result<(u32, Option<u32>), Error> {
        let n = self.parse_decimal(bytes, pos)?;
        match bytes.get(*pos).copied() {
            Some(b'}') => {
                *pos += 1;
                Ok((n, Some(n)))
            }
            Some(b',') => {
                *pos += 1;
                if bytes.get(*pos) == Some(&b'}') {
                    *pos += 1;
                    Ok((n, None))
                } else {
                    let m = self.parse_decimal(bytes, pos)?;
                    if bytes.get(*pos) != Some(&b'}') {
                        return Err(Error::compile(*pos, "malformed counted quantifier"));
                    }
                    *pos += 1;
                    if m < n {
                        return Err(Error::compile(*pos, "inverted quantifier range"));
                    }
                    Ok((n, Some(m)))
                }
            }
            _ => Err(Error::compile(*pos, "malformed counted quantifier")),
        }
    }

    fn parse_decimal(&mut self, bytes: &[u8], pos: &mut usize) -> Result<u32, Error> {
        let start = *pos;
        let mut value: u32 = 0;
        while let Some(&b) = bytes.get(*pos) {
            if !b.is_ascii_digit() {
                break;
            }
            value = value.saturating_mul(10).saturating_add((b - b'0') as u32);
            *pos += 1;
            if value as usize > MAX_STATES {
                return Err(Error::Capacity { kind: CapacityKind::States });
            }
        }
        if *pos == start {
            return Err(Error::compile(start, "expected a number"));
        }
        Ok(value)
    }

    /// Unrolls `{n,m}` (or `{n,}` when `m` is `None`) by re-compiling the
    /// base atom's source span as many times as needed: `n` mandatory
    /// copies, then either `m - n` cascaded optional copies or,
    /// for an unbounded upper bound, one more copy under `*`.
    fn quantify_counted(
        &mut self,
        bytes: &[u8],
        atom_start: usize,
        n: u32,
        m: Option<u32>,
    ) -> Result<Frag, Error> {
        if let Some(m) = m {
            if (m as usize) > MAX_STATES {
                return Err(Error::Capacity { kind: CapacityKind::States });
            }
        }

        let mut result = self.epsilon()?;
        for _ in 0..n {
            let mut p = atom_start;
            let copy = self.parse_base_atom(bytes, &mut p)?;
            result = self.concat(result, copy)?;
        }

        match m {
            Some(m) if m == n => Ok(result),
            Some(m) => {
                let extra = m - n;
                let mut tail: Option<Frag> = None;
                for _ in 0..extra {
                    let mut p = atom_start;
                    let copy = self.parse_base_atom(bytes, &mut p)?;
                    let copy = match tail {
                        None => copy,
                        Some(t) => self.concat(copy, t)?,
                    };
                    tail = Some(self.quantify_optional(copy));
                }
                match tail {
                    None => Ok(result),
                    Some(t) => self.concat(result, t),
                }
            }
            None => {
                let mut p = atom_start;
                let copy = self.parse_base_atom(bytes, &mut p)?;
                let starred = self.quantify_star(copy);
                self.concat(result, starred)
            }
        }
    }
}
