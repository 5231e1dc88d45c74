pub use validator::ValidationError;

use crate::wheel::Prize;

pub fn validate_prize_text(text: &str) -> Result<(), ValidationError> {
    if text.trim().is_empty() {
        return Err(ValidationError::new("empty_prize_text"));
    }
    Ok(())
}

/// Weights must never go negative; NaN is treated the same way.
pub fn clamp_probability(probability: f64) -> f64 {
    if probability.is_nan() || probability < 0.0 {
        0.0
    } else {
        probability
    }
}

pub fn clamp_prize_probabilities(prizes: &mut [Prize]) {
    for prize in prizes.iter_mut() {
        prize.probability = clamp_probability(prize.probability);
    }
}

pub fn has_duplicate_ids(prizes: &[Prize]) -> bool {
    prizes
        .iter()
        .enumerate()
        .any(|(i, p)| prizes[..i].iter().any(|q| q.id == p.id))
}

/// Returns `candidate` unchanged when it is free, otherwise a fresh v4 uuid
/// that is guaranteed not to collide with any id in `existing`.
pub fn unique_prize_id(existing: &[Prize], candidate: &str) -> String {
    if !candidate.is_empty() && !existing.iter().any(|p| p.id == candidate) {
        return candidate.to_string();
    }
    loop {
        let id = uuid::Uuid::new_v4().to_string();
        if !existing.iter().any(|p| p.id == id) {
            return id;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clamp_rejects_negative_and_nan() {
        assert_eq!(clamp_probability(-1.0), 0.0);
        assert_eq!(clamp_probability(f64::NAN), 0.0);
        assert_eq!(clamp_probability(12.5), 12.5);
        assert_eq!(clamp_probability(0.0), 0.0);
    }

    #[test]
    fn duplicate_ids_detected() {
        let prizes = vec![
            Prize::new("1", "a", "#fff", 1.0),
            Prize::new("2", "b", "#fff", 1.0),
            Prize::new("1", "c", "#fff", 1.0),
        ];
        assert!(has_duplicate_ids(&prizes));
        assert!(!has_duplicate_ids(&prizes[..2]));
    }

    #[test]
    fn unique_id_keeps_free_candidate() {
        let prizes = vec![Prize::new("1", "a", "#fff", 1.0)];
        assert_eq!(unique_prize_id(&prizes, "2"), "2");
    }

    #[test]
    fn unique_id_regenerates_on_collision() {
        let prizes = vec![Prize::new("1", "a", "#fff", 1.0)];
        let id = unique_prize_id(&prizes, "1");
        assert_ne!(id, "1");
        assert!(!prizes.iter().any(|p| p.id == id));
    }

    #[test]
    fn empty_text_rejected() {
        assert!(validate_prize_text("  ").is_err());
        assert!(validate_prize_text("5% OFF").is_ok());
    }
}
