//! Pivot chooser for demo and headless play

use super::hex::HexCoord;
use super::matcher::find_clusters;
use super::rotation::{apply_rotation, compute_rotation, select_rotation_group};
use super::scoring::total_destroyed;
use super::state::GameState;

/// Pick the pivot whose rotation destroys the most tiles.
///
/// Each candidate is tried on a copy of the board; ties go to the earlier
/// pivot in region order. With no matching rotation the first valid pivot is
/// returned, and `None` when input is not accepted or nothing can rotate.
pub fn choose_pivot(state: &GameState) -> Option<HexCoord> {
    if !state.accepts_input() {
        return None;
    }

    let mut best: Option<(usize, HexCoord)> = None;
    let mut first_valid = None;

    for tile in state.board.live_tiles() {
        let Ok(group) = select_rotation_group(&state.board, tile.coord) else {
            continue;
        };
        first_valid.get_or_insert(tile.coord);

        let rotation = compute_rotation(&group);
        let mut trial = state.board.clone();
        if apply_rotation(&mut trial, &rotation).is_err() {
            continue;
        }
        let destroyed = total_destroyed(&find_clusters(
            &trial,
            &rotation.destinations(),
            state.settings.min_match,
        ));
        if destroyed > 0 && best.is_none_or(|(most, _)| destroyed > most) {
            best = Some((destroyed, tile.coord));
        }
    }

    if let Some((destroyed, coord)) = best {
        log::trace!("Autoplay picked {} ({} tiles)", coord, destroyed);
    }
    best.map(|(_, coord)| coord).or(first_valid)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::board::Board;
    use crate::sim::hex::hexagon;
    use crate::sim::state::GamePhase;
    use crate::sim::tick::{RotationOutcome, select_tile};

    #[test]
    fn test_choose_pivot_finds_match() {
        // Two pairs of 2s on opposite sides of a 1 center; bringing a 2 into
        // the center joins them
        let values = [
            ((0, 0), 1),
            ((1, 0), 2),
            ((1, -1), 2),
            ((0, -1), 1),
            ((-1, 0), 2),
            ((-1, 1), 2),
            ((0, 1), 3),
        ];
        let board = Board::from_values(1, values.map(|(qr, v)| (HexCoord::from(qr), v))).unwrap();
        let settings = Settings {
            min_match: 4,
            safe_cluster_cap: 3,
            ..Settings::default()
        };
        assert!(find_clusters(&board, &[], 4).is_empty());
        let mut state = GameState::with_board(settings, board, 3).unwrap();

        let pivot = choose_pivot(&state).unwrap();
        let outcome = select_tile(&mut state, pivot).unwrap();
        let RotationOutcome::Applied { matches, .. } = outcome else {
            panic!("expected rotation, got {outcome:?}");
        };
        assert!(matches.is_match());
    }

    #[test]
    fn test_choose_pivot_fallback_and_blocked() {
        let board = Board::from_values(
            2,
            hexagon(2).map(|c| (c, (c.q + 2 * c.r).rem_euclid(3) as u8 + 1)),
        )
        .unwrap();
        let settings = Settings {
            min_match: 20,
            ..Settings::default()
        };
        let mut state = GameState::with_board(settings, board, 3).unwrap();
        // Nothing can match; first pivot in region order wins
        assert_eq!(choose_pivot(&state), hexagon(2).next());

        state.phase = GamePhase::Resolving;
        assert_eq!(choose_pivot(&state), None);

        let lonely = Board::from_values(2, [(HexCoord::ORIGIN, 1)]).unwrap();
        let state = GameState::with_board(Settings::default(), lonely, 3).unwrap();
        assert_eq!(choose_pivot(&state), None);
    }
}
