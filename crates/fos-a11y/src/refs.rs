//! Id reference lists
//!
//! Helpers for whitespace-separated id lists and for "live" references:
//! id fragments that match rendered ids carrying an optional `-<digits>`
//! index suffix.

/// Collapse whitespace in an id list to single spaces
pub fn normalize_id_list(raw: &str) -> String {
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Join ids into a normalized id list
pub fn join_ids<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out = String::new();
    for id in ids {
        for token in id.as_ref().split_whitespace() {
            if !out.is_empty() {
                out.push(' ');
            }
            out.push_str(token);
        }
    }
    out
}

fn is_index_suffix(rest: &str) -> bool {
    rest.strip_prefix('-')
        .is_some_and(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
}

/// Strip one trailing `-<digits>` index suffix
pub fn strip_index_suffix(id: &str) -> &str {
    match id.rfind('-') {
        Some(pos) if is_index_suffix(&id[pos..]) => &id[..pos],
        _ => id,
    }
}

/// Parsed live id reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveRefs {
    key: String,
    fragments: Vec<String>,
}

impl LiveRefs {
    pub fn parse(raw: &str) -> Self {
        let fragments: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
        Self {
            key: fragments.join(" "),
            fragments,
        }
    }

    /// Canonical key, one per distinct fragment list
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn fragments(&self) -> &[String] {
        &self.fragments
    }

    /// Substring selector for candidate elements
    pub fn selector(&self) -> String {
        self.fragments
            .iter()
            .map(|fragment| format!("[id*=\"{fragment}\"]"))
            .collect::<Vec<_>>()
            .join(",")
    }

    /// Ordering key: the fragment position of the id with its index suffix
    /// stripped, `-1` when no fragment equals it
    pub fn sort_key(&self, id: &str) -> isize {
        let base = strip_index_suffix(id);
        self.fragments
            .iter()
            .position(|fragment| fragment == base)
            .map_or(-1, |pos| pos as isize)
    }

    /// An id matches a fragment exactly or followed by `-<digits>`
    ///
    /// The suffix is optional: a bare fragment id such as `help` matches,
    /// unlike a `^(help)(-[0-9]+)$` pattern that requires an index.
    pub fn matches(&self, id: &str) -> bool {
        self.fragments.iter().any(|fragment| {
            id.strip_prefix(fragment.as_str())
                .is_some_and(|rest| rest.is_empty() || is_index_suffix(rest))
        })
    }
}
