//! Data Injector — embeds the resume data and section order into the composed template.
//!
//! The template declares two placeholder bindings ("slots"):
//!
//! ```typst
//! #let private_info = json("private_info.json")
//! #let section_order = json("section_order.json")
//! ```
//!
//! Each is replaced by a literal of the serialized payload:
//!
//! ```typst
//! #let private_info = json(bytes("{\"basics\":{...}}"))
//! ```
//!
//! `bytes(...)` keeps the payload a UTF-8 byte sequence so `json` decodes it
//! exactly as serialized. A slot that is absent is either recorded and skipped
//! (lenient) or reported as an error (strict).

use std::fmt;
use std::ops::Range;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;
use tracing::{debug, warn};

use crate::errors::PipelineError;
use crate::models::{ResumeData, SectionOrder};

// ────────────────────────────────────────────────────────────────────────────
// Slots and policy
// ────────────────────────────────────────────────────────────────────────────

/// A placeholder declaration the injector knows how to fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    ResumeData,
    SectionOrder,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::ResumeData, Slot::SectionOrder];

    /// The Typst identifier bound by the placeholder declaration.
    pub fn identifier(self) -> &'static str {
        match self {
            Slot::ResumeData => "private_info",
            Slot::SectionOrder => "section_order",
        }
    }

    fn pattern(self) -> &'static Regex {
        static RESUME_DATA_RE: OnceLock<Regex> = OnceLock::new();
        static SECTION_ORDER_RE: OnceLock<Regex> = OnceLock::new();

        let cell = match self {
            Slot::ResumeData => &RESUME_DATA_RE,
            Slot::SectionOrder => &SECTION_ORDER_RE,
        };
        cell.get_or_init(|| {
            Regex::new(&declaration_pattern(self.identifier()))
                .expect("placeholder pattern is a valid regex")
        })
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.identifier())
    }
}

/// What to do when a slot's placeholder declaration is missing from the template.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PlaceholderPolicy {
    /// Log, record the slot in [`ComposedSource::missing_slots`], keep going.
    #[default]
    Lenient,
    /// Fail with [`PipelineError::PlaceholderMissing`].
    Strict,
}

impl std::str::FromStr for PlaceholderPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(PlaceholderPolicy::Lenient),
            "strict" => Ok(PlaceholderPolicy::Strict),
            other => Err(format!("unknown placeholder policy '{other}' (expected lenient or strict)")),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Pattern and escaping
// ────────────────────────────────────────────────────────────────────────────

/// A double-quoted Typst string literal, honouring backslash escapes.
const STRING_LITERAL: &str = r#""(?:[^"\\]|\\.)*""#;

/// `#let <ident> = json("...")`, also accepting an already-injected `json(bytes("..."))`.
fn declaration_pattern(identifier: &str) -> String {
    format!(
        r"#let\s+{ident}\s*=\s*json\s*\(\s*(?:{lit}|bytes\s*\(\s*{lit}\s*\))\s*\)",
        ident = regex::escape(identifier),
        lit = STRING_LITERAL,
    )
}

/// Escapes `raw` for embedding between double quotes.
///
/// Backslashes first, then quotes; the reverse order would double-escape the
/// backslashes introduced for the quotes.
pub fn escape_string_literal(raw: &str) -> String {
    raw.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Serializes `payload` and renders the full replacement declaration for `slot`.
pub fn render_declaration<T: Serialize + ?Sized>(
    slot: Slot,
    payload: &T,
) -> Result<String, PipelineError> {
    let json = serde_json::to_string(payload)?;
    Ok(format!(
        "#let {} = json(bytes(\"{}\"))",
        slot.identifier(),
        escape_string_literal(&json)
    ))
}

// ────────────────────────────────────────────────────────────────────────────
// Slotted source
// ────────────────────────────────────────────────────────────────────────────

/// Template text with its fill-in points located once, up front.
#[derive(Debug, Clone)]
pub struct SlottedSource<'a> {
    text: &'a str,
    resume_data: Option<Range<usize>>,
    section_order: Option<Range<usize>>,
}

impl<'a> SlottedSource<'a> {
    /// Finds the first placeholder declaration of each slot in `text`.
    pub fn locate(text: &'a str) -> Self {
        let find = |slot: Slot| slot.pattern().find(text).map(|m| m.range());
        Self {
            text,
            resume_data: find(Slot::ResumeData),
            section_order: find(Slot::SectionOrder),
        }
    }

    pub fn span(&self, slot: Slot) -> Option<Range<usize>> {
        match slot {
            Slot::ResumeData => self.resume_data.clone(),
            Slot::SectionOrder => self.section_order.clone(),
        }
    }

    pub fn has(&self, slot: Slot) -> bool {
        self.span(slot).is_some()
    }

    pub fn missing(&self) -> Vec<Slot> {
        Slot::ALL.into_iter().filter(|s| !self.has(*s)).collect()
    }

    /// Replaces each located slot with its declaration; absent slots are skipped.
    /// Text outside the located spans is copied through unchanged.
    pub fn fill(&self, declarations: &[(Slot, String)]) -> String {
        let mut edits: Vec<(Range<usize>, &str)> = declarations
            .iter()
            .filter_map(|(slot, decl)| self.span(*slot).map(|r| (r, decl.as_str())))
            .collect();
        edits.sort_by_key(|(range, _)| range.start);

        let mut out = String::with_capacity(self.text.len());
        let mut cursor = 0;
        for (range, decl) in edits {
            // Overlapping declarations cannot both be rewritten; keep the earlier one.
            if range.start < cursor {
                continue;
            }
            out.push_str(&self.text[cursor..range.start]);
            out.push_str(decl);
            cursor = range.end;
        }
        out.push_str(&self.text[cursor..]);
        out
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Composed source
// ────────────────────────────────────────────────────────────────────────────

/// The flattened, data-injected document source, ready for the rendering engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSource {
    text: String,
    missing_slots: Vec<Slot>,
}

impl ComposedSource {
    pub fn new(text: String, missing_slots: Vec<Slot>) -> Self {
        Self {
            text,
            missing_slots,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Slots whose placeholder was absent (lenient policy only).
    pub fn missing_slots(&self) -> &[Slot] {
        &self.missing_slots
    }

    pub fn is_complete(&self) -> bool {
        self.missing_slots.is_empty()
    }
}

/// Injects `data` and `order` into `template` according to `policy`.
///
/// Neither input is modified. Strict mode checks both slots before any rewrite,
/// so it fails without producing a partially-injected source.
pub fn inject(
    template: &str,
    data: &ResumeData,
    order: &SectionOrder,
    policy: PlaceholderPolicy,
) -> Result<ComposedSource, PipelineError> {
    let slotted = SlottedSource::locate(template);
    let missing = slotted.missing();

    if let (PlaceholderPolicy::Strict, Some(slot)) = (policy, missing.first()) {
        return Err(PipelineError::PlaceholderMissing { slot: *slot });
    }

    for slot in &missing {
        warn!(slot = %slot, "Could not find placeholder declaration in template; slot left unfilled");
    }

    let declarations = vec![
        (Slot::ResumeData, render_declaration(Slot::ResumeData, data)?),
        (Slot::SectionOrder, render_declaration(Slot::SectionOrder, order)?),
    ];

    let text = slotted.fill(&declarations);
    debug!(
        "Injected {} of {} slots ({} bytes)",
        Slot::ALL.len() - missing.len(),
        Slot::ALL.len(),
        text.len()
    );

    Ok(ComposedSource::new(text, missing))
}
