use crate::domain::{Path, Token};

/// Enumerates the candidate paths for a swap
///
/// The direct path comes first, then one path per usable bridge token in
/// bridge order. Bridges equal to either endpoint are skipped.
pub fn candidate_paths(token_in: &Token, token_out: &Token, bridges: &[Token]) -> Vec<Path> {
    let mut paths = Vec::with_capacity(bridges.len() + 1);

    if let Some(direct) = Path::direct(token_in.clone(), token_out.clone()) {
        paths.push(direct);
    } else {
        return paths;
    }

    paths.extend(
        bridges
            .iter()
            .filter_map(|bridge| Path::via(token_in.clone(), bridge.clone(), token_out.clone())),
    );

    paths
}
