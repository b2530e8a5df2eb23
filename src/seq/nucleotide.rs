// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Peter Carlton

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Nucleotide {
    A,
    C,
    G,
    T,
}

impl Nucleotide {
    pub const ALL: [Nucleotide; 4] = [Nucleotide::A, Nucleotide::C, Nucleotide::G, Nucleotide::T];

    pub fn as_char(self) -> char {
        match self {
            Nucleotide::A => 'A',
            Nucleotide::C => 'C',
            Nucleotide::G => 'G',
            Nucleotide::T => 'T',
        }
    }

    // Position in ALL; used to index per-nucleotide arrays.
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_char(c: char) -> Option<Nucleotide> {
        match c.to_ascii_uppercase() {
            'A' => Some(Nucleotide::A),
            'C' => Some(Nucleotide::C),
            'G' => Some(Nucleotide::G),
            'T' => Some(Nucleotide::T),
            _ => None,
        }
    }
}

impl fmt::Display for Nucleotide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// The two nucleotides whose combined share is reported as "paired content" (C and G by default,
/// i.e. GC content).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairedSymbols(pub Nucleotide, pub Nucleotide);

impl Default for PairedSymbols {
    fn default() -> Self {
        PairedSymbols(Nucleotide::C, Nucleotide::G)
    }
}

impl PairedSymbols {
    /// Parses a two-letter pair such as "CG" or "at".
    pub fn parse(s: &str) -> Option<PairedSymbols> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(a), Some(b), None) => {
                let first = Nucleotide::from_char(a)?;
                let second = Nucleotide::from_char(b)?;
                if first == second {
                    None
                } else {
                    Some(PairedSymbols(first, second))
                }
            }
            _ => None,
        }
    }
}

impl fmt::Display for PairedSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.0, self.1)
    }
}
