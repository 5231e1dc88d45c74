use std::fmt;

use rand::Rng;

use crate::wheel::{Prize, WheelConfig};

/// Terminal failures for one spin attempt. The caller must surface these
/// and abort; there is no silent fallback to an arbitrary prize.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionError {
    /// Normal mode: every prize is either zero-weight or reserved.
    NoEligiblePrizes,
    /// VIP mode: no prize id is on the reserved list.
    NoPremiumPrizesConfigured,
    /// A reserved prize survived every exclusion layer. Data-integrity bug.
    SecurityInvariantViolated,
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionError::NoEligiblePrizes => {
                write!(f, "no eligible prizes: configure at least one prize with probability > 0")
            }
            SelectionError::NoPremiumPrizesConfigured => {
                write!(f, "VIP mode is on but no reserved prizes are configured")
            }
            SelectionError::SecurityInvariantViolated => {
                write!(f, "selection produced a reserved prize; spin aborted")
            }
        }
    }
}

impl std::error::Error for SelectionError {}

/// Picks exactly one winner from `prizes` under the rules of `config`.
///
/// Normal mode draws from prizes with positive weight whose id is not on
/// the reserved list. VIP mode draws exclusively from the reserved list,
/// counting every entry at `max(probability, 1)` so a zero-weight
/// "legendary" prize can still be won there.
///
/// The RNG is injected so tests can seed it.
pub fn select_winner<'a, R: Rng>(
    prizes: &'a [Prize],
    config: &WheelConfig,
    rng: &mut R,
) -> Result<&'a Prize, SelectionError> {
    if config.vip_mode {
        select_vip(prizes, config, rng)
    } else {
        select_normal(prizes, config, rng)
    }
}

fn select_normal<'a, R: Rng>(
    prizes: &'a [Prize],
    config: &WheelConfig,
    rng: &mut R,
) -> Result<&'a Prize, SelectionError> {
    let eligible: Vec<&Prize> = prizes
        .iter()
        .filter(|p| p.probability > 0.0 && !config.blocked_ids.contains(&p.id))
        .collect();

    if eligible.is_empty() {
        return Err(SelectionError::NoEligiblePrizes);
    }

    let mut winner = weighted_draw(&eligible, |p| p.probability, rng);

    // Layered re-check: structurally unreachable given the filter above,
    // kept so a future weakening of that filter cannot leak a reserved
    // prize into a normal spin.
    if config.blocked_ids.contains(&winner.id) {
        winner = eligible[rng.gen_range(0..eligible.len())];
        if config.blocked_ids.contains(&winner.id) {
            winner = eligible[0];
            if config.blocked_ids.contains(&winner.id) {
                tracing::error!(
                    "reserved prize {} passed every exclusion layer, aborting spin",
                    winner.id
                );
                return Err(SelectionError::SecurityInvariantViolated);
            }
        }
    }

    Ok(winner)
}

fn select_vip<'a, R: Rng>(
    prizes: &'a [Prize],
    config: &WheelConfig,
    rng: &mut R,
) -> Result<&'a Prize, SelectionError> {
    let eligible: Vec<&Prize> = prizes
        .iter()
        .filter(|p| config.blocked_ids.contains(&p.id))
        .collect();

    if eligible.is_empty() {
        return Err(SelectionError::NoPremiumPrizesConfigured);
    }

    Ok(weighted_draw(&eligible, |p| p.probability.max(1.0), rng))
}

/// Cumulative-weight inversion: draw r in [0, total), walk the entries in
/// order subtracting weights; first entry driving the remainder to <= 0
/// wins. Falls through to the last entry so floating-point edge cases can
/// never yield "no winner".
fn weighted_draw<'a, R, W>(entries: &[&'a Prize], weight: W, rng: &mut R) -> &'a Prize
where
    R: Rng,
    W: Fn(&Prize) -> f64,
{
    let total: f64 = entries.iter().map(|p| weight(p)).sum();
    let mut remaining = rng.gen_range(0.0..total);

    for &entry in entries {
        remaining -= weight(entry);
        if remaining <= 0.0 {
            return entry;
        }
    }

    entries[entries.len() - 1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn config(blocked: &[&str], vip: bool) -> WheelConfig {
        WheelConfig {
            blocked_ids: blocked.iter().map(|s| s.to_string()).collect(),
            vip_mode: vip,
            ..WheelConfig::default()
        }
    }

    fn prize(id: &str, probability: f64) -> Prize {
        Prize::new(id, format!("prize {id}"), "#ffffff", probability)
    }

    #[test]
    fn normal_mode_never_picks_reserved_or_zero_weight() {
        let prizes = vec![
            prize("1", 0.0),
            prize("2", 10.0),
            prize("3", 5.0),
            prize("4", 20.0),
        ];
        let cfg = config(&["3"], false);
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..5_000 {
            let winner = select_winner(&prizes, &cfg, &mut rng).unwrap();
            assert!(winner.probability > 0.0);
            assert!(!cfg.blocked_ids.contains(&winner.id));
        }
    }

    #[test]
    fn vip_mode_picks_only_reserved_prizes() {
        let prizes = vec![
            prize("1", 0.0),
            prize("2", 90.0),
            prize("3", 10.0),
        ];
        let cfg = config(&["1", "3"], true);
        let mut rng = StdRng::seed_from_u64(11);

        for _ in 0..5_000 {
            let winner = select_winner(&prizes, &cfg, &mut rng).unwrap();
            assert!(cfg.blocked_ids.contains(&winner.id));
        }
    }

    #[test]
    fn vip_mode_zero_weight_reserved_prize_is_winnable() {
        let prizes = vec![prize("1", 0.0), prize("2", 50.0)];
        let cfg = config(&["1"], true);
        let mut rng = StdRng::seed_from_u64(3);

        let winner = select_winner(&prizes, &cfg, &mut rng).unwrap();
        assert_eq!(winner.id, "1");
    }

    #[test]
    fn empty_eligible_set_fails_closed() {
        let cfg = config(&[], false);
        let mut rng = StdRng::seed_from_u64(1);

        // No prizes at all.
        assert_eq!(
            select_winner(&[], &cfg, &mut rng),
            Err(SelectionError::NoEligiblePrizes)
        );

        // Only zero-weight prizes.
        let prizes = vec![prize("1", 0.0)];
        assert_eq!(
            select_winner(&prizes, &cfg, &mut rng),
            Err(SelectionError::NoEligiblePrizes)
        );

        // Every positive-weight prize is reserved.
        let prizes = vec![prize("1", 10.0), prize("2", 0.0)];
        let cfg = config(&["1"], false);
        assert_eq!(
            select_winner(&prizes, &cfg, &mut rng),
            Err(SelectionError::NoEligiblePrizes)
        );
    }

    #[test]
    fn vip_mode_without_reserved_prizes_fails_closed() {
        let prizes = vec![prize("1", 10.0), prize("2", 20.0)];
        let cfg = config(&[], true);
        let mut rng = StdRng::seed_from_u64(1);

        assert_eq!(
            select_winner(&prizes, &cfg, &mut rng),
            Err(SelectionError::NoPremiumPrizesConfigured)
        );
    }

    #[test]
    fn reserved_zero_weight_entry_forces_the_only_live_prize() {
        // id 1 is reserved with zero weight; id 2 carries all the weight.
        let prizes = vec![prize("1", 0.0), prize("2", 100.0)];
        let cfg = config(&["1"], false);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..1_000 {
            let winner = select_winner(&prizes, &cfg, &mut rng).unwrap();
            assert_eq!(winner.id, "2");
        }
    }

    #[test]
    fn vip_flip_of_same_wheel_forces_the_reserved_prize() {
        let prizes = vec![prize("1", 0.0), prize("2", 100.0)];
        let cfg = config(&["1"], true);
        let mut rng = StdRng::seed_from_u64(99);

        for _ in 0..1_000 {
            let winner = select_winner(&prizes, &cfg, &mut rng).unwrap();
            assert_eq!(winner.id, "1");
        }
    }

    #[test]
    fn heavier_prizes_win_more_often() {
        let prizes = vec![prize("a", 75.0), prize("b", 25.0)];
        let cfg = config(&[], false);
        let mut rng = StdRng::seed_from_u64(42);

        let draws = 10_000;
        let mut a_wins = 0usize;
        for _ in 0..draws {
            if select_winner(&prizes, &cfg, &mut rng).unwrap().id == "a" {
                a_wins += 1;
            }
        }

        let ratio = a_wins as f64 / draws as f64;
        // Expected 0.75; a seeded run lands comfortably inside +/- 0.03.
        assert!(ratio > 0.72 && ratio < 0.78, "ratio was {ratio}");
    }

    #[test]
    fn selection_order_does_not_change_weights() {
        let forward = vec![prize("a", 30.0), prize("b", 70.0)];
        let reversed = vec![prize("b", 70.0), prize("a", 30.0)];
        let cfg = config(&[], false);

        let draws = 10_000;
        let count = |prizes: &[Prize], seed: u64| {
            let mut rng = StdRng::seed_from_u64(seed);
            (0..draws)
                .filter(|_| select_winner(prizes, &cfg, &mut rng).unwrap().id == "b")
                .count()
        };

        let forward_b = count(&forward, 5) as f64 / draws as f64;
        let reversed_b = count(&reversed, 6) as f64 / draws as f64;
        assert!((forward_b - 0.7).abs() < 0.03, "forward ratio {forward_b}");
        assert!((reversed_b - 0.7).abs() < 0.03, "reversed ratio {reversed_b}");
    }
}
