use super::model::Track;

/// Subsequence match: the char positions in `text` that match `query`
/// (ASCII case-insensitive), or `None` when `query` is not a subsequence.
pub fn fuzzy_match_positions(text: &str, query: &str) -> Option<Vec<usize>> {
    if query.is_empty() {
        return Some(Vec::new());
    }

    let mut positions: Vec<usize> = Vec::new();
    let mut text_iter = text.chars().enumerate();

    for qc in query.chars() {
        let qc_low = qc.to_ascii_lowercase();
        loop {
            match text_iter.next() {
                Some((ti, tc)) if tc.to_ascii_lowercase() == qc_low => {
                    positions.push(ti);
                    break;
                }
                Some(_) => continue,
                None => return None,
            }
        }
    }

    Some(positions)
}

/// Indices of `tracks` whose title, artist, album or genre fuzzy-match `query`.
///
/// Whitespace around the query is ignored; a blank query matches everything.
pub fn search(tracks: &[Track], query: &str) -> Vec<usize> {
    let query = query.trim();
    if query.is_empty() {
        return (0..tracks.len()).collect();
    }

    tracks
        .iter()
        .enumerate()
        .filter(|(_, t)| fuzzy_match_positions(&t.haystack(), query).is_some())
        .map(|(i, _)| i)
        .collect()
}
