use bio::alphabets::dna;

// Counts of each nucleotide in a sequence
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaseCounts {
    pub a: usize,
    pub c: usize,
    pub g: usize,
    pub t: usize,
}

impl BaseCounts {
    pub fn gc(&self) -> usize {
        self.g + self.c
    }

    pub fn at(&self) -> usize {
        self.a + self.t
    }

    pub fn total(&self) -> usize {
        self.a + self.c + self.g + self.t
    }
}

/// Strip whitespace (including CR/LF left over from uploaded files) and uppercase.
pub fn normalize_sequence(seq: &str) -> String {
    seq.chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| c.to_ascii_uppercase())
        .collect()
}

/// Return the position and character of the first base outside {A,C,G,T}, if any.
pub fn find_invalid_base(seq: &str) -> Option<(usize, char)> {
    seq.chars()
        .enumerate()
        .find(|(_, c)| !matches!(c, 'A' | 'C' | 'G' | 'T'))
}

// Count bases, anything outside of ACGT is ignored
pub fn count_bases(seq: &str) -> BaseCounts {
    let mut counts = BaseCounts::default();
    for c in seq.bytes() {
        match c {
            b'A' => counts.a += 1,
            b'C' => counts.c += 1,
            b'G' => counts.g += 1,
            b'T' => counts.t += 1,
            _ => {}
        }
    }
    counts
}

// Expects a validated ACGT sequence
pub fn reverse_complement(seq: &str) -> String {
    String::from_utf8_lossy(&dna::revcomp(seq.as_bytes())).into_owned()
}
