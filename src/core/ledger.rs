//! Review ledger extraction from plan documents.
//!
//! The ledger is a fixed two-line grammar following a section header:
//!
//! ```text
//! ## Plan Review Status
//! Reviews: 2/3
//! Status: APPROVED
//! ```
//!
//! The block is agent-authored free text, so anything that does not match
//! the grammar is the defined absent state, never an error. Absence only
//! means no reviews have been recorded yet. The state is recomputed from
//! the current document on every gate check; the document may be edited
//! between invocations.

/// Section header introducing the ledger block.
pub const LEDGER_HEADER: &str = "## Plan Review Status";
/// Status word that counts as consensus.
pub const APPROVED_SENTINEL: &str = "APPROVED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReviewStatus {
    /// No ledger block recorded.
    None,
    Approved,
    /// Unrecognized status words are preserved verbatim; they never count
    /// as approval.
    Other(String),
}

impl std::fmt::Display for ReviewStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ReviewStatus::None => write!(f, "NONE"),
            ReviewStatus::Approved => write!(f, "APPROVED"),
            ReviewStatus::Other(word) => write!(f, "{word}"),
        }
    }
}

/// Review state derived from one plan document. Never cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewState {
    pub present: bool,
    pub approved: bool,
    pub review_count: u32,
    pub status: ReviewStatus,
}

impl ReviewState {
    pub fn absent() -> Self {
        ReviewState {
            present: false,
            approved: false,
            review_count: 0,
            status: ReviewStatus::None,
        }
    }
}

/// Scan `plan` for the first well-formed ledger block.
///
/// Must not fail on arbitrary unrelated text; a header followed by a
/// malformed body is skipped and scanning continues.
pub fn parse_review_ledger(plan: &str) -> ReviewState {
    let lines: Vec<&str> = plan.lines().collect();
    for (i, line) in lines.iter().enumerate() {
        if line.trim() != LEDGER_HEADER {
            continue;
        }
        if let Some(state) = parse_block(&lines[i + 1..]) {
            return state;
        }
    }
    ReviewState::absent()
}

fn parse_block(rest: &[&str]) -> Option<ReviewState> {
    let mut content = rest.iter().filter(|l| !l.trim().is_empty());
    let review_count = parse_reviews_line(content.next()?)?;
    let word = parse_status_line(content.next()?)?;
    let approved = word.eq_ignore_ascii_case(APPROVED_SENTINEL);
    Some(ReviewState {
        present: true,
        approved,
        review_count,
        status: if approved {
            ReviewStatus::Approved
        } else {
            ReviewStatus::Other(word)
        },
    })
}

/// `Reviews: <int>/<int>`: the count is the first integer; the
/// denominator must parse but its value is not used.
fn parse_reviews_line(line: &str) -> Option<u32> {
    let rest = line.trim().strip_prefix("Reviews:")?;
    let (count, denominator) = rest.split_once('/')?;
    let count = count.trim().parse::<u32>().ok()?;
    denominator.trim().parse::<u32>().ok()?;
    Some(count)
}

/// `Status: <word>`: captures the leading word, tolerating trailing text.
fn parse_status_line(line: &str) -> Option<String> {
    let rest = line.trim().strip_prefix("Status:")?;
    let word: String = rest
        .trim_start()
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect();
    (!word.is_empty()).then_some(word)
}
