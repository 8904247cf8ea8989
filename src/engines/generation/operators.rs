use crate::types::Alphabet;
use rand::Rng;

/// Outcome of the mutation draw in `mutate`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Substitute,
    Insert,
    Delete,
    /// Returned a quarter of the time; the sequence is kept as is
    Keep,
}

impl MutationKind {
    /// Equal 25% mass on each of the four outcomes
    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let op = rng.gen::<f64>();
        if op < 0.25 {
            Self::Substitute
        } else if op < 0.5 {
            Self::Insert
        } else if op < 0.75 {
            Self::Delete
        } else {
            Self::Keep
        }
    }
}

fn random_symbol<R: Rng + ?Sized>(alphabet: &Alphabet, rng: &mut R) -> Option<char> {
    if alphabet.is_empty() {
        return None;
    }
    Some(alphabet.symbols()[rng.gen_range(0..alphabet.len())])
}

/// Point substitution: one random position gets a random symbol
/// (possibly the one already there).
pub fn substitute<R: Rng + ?Sized>(sequence: &str, alphabet: &Alphabet, rng: &mut R) -> String {
    let mut residues: Vec<char> = sequence.chars().collect();
    if residues.is_empty() {
        return sequence.to_string();
    }
    let idx = rng.gen_range(0..residues.len());
    if let Some(symbol) = random_symbol(alphabet, rng) {
        residues[idx] = symbol;
    }
    residues.into_iter().collect()
}

/// Insert one random symbol at one of the `len + 1` gaps
pub fn insert_symbol<R: Rng + ?Sized>(sequence: &str, alphabet: &Alphabet, rng: &mut R) -> String {
    // Empty input stays empty
    if sequence.is_empty() {
        return String::new();
    }
    let mut residues: Vec<char> = sequence.chars().collect();
    let idx = rng.gen_range(0..=residues.len());
    if let Some(symbol) = random_symbol(alphabet, rng) {
        residues.insert(idx, symbol);
    }
    residues.into_iter().collect()
}

/// Remove one random position
pub fn delete_symbol<R: Rng + ?Sized>(sequence: &str, rng: &mut R) -> String {
    let mut residues: Vec<char> = sequence.chars().collect();
    if residues.is_empty() {
        return String::new();
    }
    let idx = rng.gen_range(0..residues.len());
    residues.remove(idx);
    residues.into_iter().collect()
}

/// Single-point crossover: `a[..cut] + b[cut..]` with `cut` drawn from
/// `1..=min(len a, len b) - 1`.
///
/// Returns `None` when either parent is shorter than 2, since no cut point exists.
pub fn recombine<R: Rng + ?Sized>(a: &str, b: &str, rng: &mut R) -> Option<String> {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let len = a.len().min(b.len());
    if len < 2 {
        return None;
    }

    let cut = rng.gen_range(1..len);
    Some(a[..cut].iter().chain(&b[cut..]).collect())
}

/// Apply one randomly drawn mutation
pub fn mutate<R: Rng + ?Sized>(sequence: &str, alphabet: &Alphabet, rng: &mut R) -> String {
    match MutationKind::draw(rng) {
        MutationKind::Substitute => substitute(sequence, alphabet, rng),
        MutationKind::Insert => insert_symbol(sequence, alphabet, rng),
        MutationKind::Delete => delete_symbol(sequence, rng),
        MutationKind::Keep => sequence.to_string(),
    }
}
