use rand::seq::SliceRandom;
use rand::Rng;

/// Number of suggestion buttons shown at once.
pub const SUGGESTION_COUNT: usize = 4;

pub const SUGGESTIONS: [&str; 9] = [
    "Tell me a story",
    "What is your favorite spell?",
    "How are you today?",
    "Do you like magic?",
    "What's the meaning of life?",
    "Can you recommend a book?",
    "Tell me a fun fact",
    "Do you believe in spirits?",
    "How can I stay calm and focused?",
];

/// Uniformly shuffle a copy of `all` and keep the first `k`.
pub fn pick_with<R, S>(rng: &mut R, all: &[S], k: usize) -> Vec<String>
where
    R: Rng + ?Sized,
    S: AsRef<str>,
{
    let mut shuffled: Vec<&S> = all.iter().collect();
    shuffled.shuffle(rng);
    shuffled
        .into_iter()
        .take(k)
        .map(|s| s.as_ref().to_string())
        .collect()
}

pub fn pick<S: AsRef<str>>(all: &[S], k: usize) -> Vec<String> {
    pick_with(&mut rand::thread_rng(), all, k)
}

/// A fresh set of built-in suggestions.
pub fn sample() -> Vec<String> {
    pick(&SUGGESTIONS, SUGGESTION_COUNT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    #[test]
    fn test_pick_returns_k_distinct_members() {
        for _ in 0..200 {
            let picked = pick(&SUGGESTIONS, 4);
            assert_eq!(picked.len(), 4);
            let unique: HashSet<&String> = picked.iter().collect();
            assert_eq!(unique.len(), 4);
            assert!(picked.iter().all(|p| SUGGESTIONS.contains(&p.as_str())));
        }
    }

    #[test]
    fn test_k_larger_than_list_returns_everything() {
        let all = ["a", "b", "c"];
        let mut picked = pick(&all, 4);
        picked.sort();
        assert_eq!(picked, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_empty_list() {
        let all: [&str; 0] = [];
        assert!(pick(&all, 4).is_empty());
    }

    #[test]
    fn test_seeded_rng_is_reproducible() {
        let a = pick_with(&mut StdRng::seed_from_u64(7), &SUGGESTIONS, 4);
        let b = pick_with(&mut StdRng::seed_from_u64(7), &SUGGESTIONS, 4);
        assert_eq!(a, b);
    }

    #[test]
    fn test_every_prompt_can_lead() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut leaders = HashSet::new();
        for _ in 0..2000 {
            leaders.insert(pick_with(&mut rng, &SUGGESTIONS, 1).remove(0));
        }
        assert_eq!(leaders.len(), SUGGESTIONS.len());
    }
}
