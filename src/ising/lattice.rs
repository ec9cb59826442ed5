use rand::distributions::{Distribution, Standard};
use rand::Rng;
use std::fmt;

use super::error::IsingError;

/// A single Ising spin.
///
/// The two variants are the only values a lattice cell can hold, so the
/// `±1` invariant is carried by the type instead of being re-checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Spin {
    Down = -1,
    Up = 1,
}

impl Spin {
    #[inline]
    pub fn value(self) -> i8 {
        self as i8
    }

    #[inline]
    pub fn as_f64(self) -> f64 {
        self.value() as f64
    }

    #[inline]
    pub fn flipped(self) -> Spin {
        match self {
            Spin::Up => Spin::Down,
            Spin::Down => Spin::Up,
        }
    }
}

impl Distribution<Spin> for Standard {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Spin {
        if rng.gen_bool(0.5) {
            Spin::Up
        } else {
            Spin::Down
        }
    }
}

/// Lattice coordinate `(row, col)`, both in `[0, N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Site {
    pub row: usize,
    pub col: usize,
}

impl Site {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Row-major linear index `z` to `(z / N, z mod N)`.
    #[inline]
    pub fn from_linear(index: usize, side: usize) -> Self {
        Self {
            row: index / side,
            col: index % side,
        }
    }

    #[inline]
    pub fn linear(&self, side: usize) -> usize {
        self.row * side + self.col
    }
}

/// Axis-aligned neighbor offsets: up, down, left, right.
const NEIGHBOR_OFFSETS: [(isize, isize); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

#[inline]
fn wrap(index: usize, delta: isize, side: usize) -> usize {
    (index as isize + delta).rem_euclid(side as isize) as usize
}

/// N x N square lattice of spins with periodic (toroidal) boundaries.
///
/// Spins are stored row-major. The total spin is kept up to date on every
/// write so that `magnetization` never has to rescan the grid.
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    side: usize,
    spins: Vec<Spin>,
    spin_sum: i64,
}

impl Lattice {
    /// Fill an N x N grid with independent, equally likely `±1` spins.
    pub fn random<R: Rng + ?Sized>(side: usize, rng: &mut R) -> Result<Self, IsingError> {
        let n_sites = site_count(side)?;
        let spins = (0..n_sites).map(|_| rng.gen::<Spin>()).collect();
        Ok(Self::assemble(side, spins))
    }

    /// Every site holds the same spin (the fully ordered state for `Spin::Up`).
    pub fn uniform(side: usize, spin: Spin) -> Result<Self, IsingError> {
        let n_sites = site_count(side)?;
        Ok(Self::assemble(side, vec![spin; n_sites]))
    }

    /// Build a lattice from an explicit row-major spin list.
    pub fn from_spins(side: usize, spins: Vec<Spin>) -> Result<Self, IsingError> {
        let n_sites = site_count(side)?;
        if spins.len() != n_sites {
            return Err(IsingError::SpinCountMismatch {
                side,
                expected: n_sites,
                actual: spins.len(),
            });
        }
        Ok(Self::assemble(side, spins))
    }

    fn assemble(side: usize, spins: Vec<Spin>) -> Self {
        let spin_sum = spins.iter().map(|s| s.value() as i64).sum();
        Self {
            side,
            spins,
            spin_sum,
        }
    }

    /// Side length N
    #[inline]
    pub fn side(&self) -> usize {
        self.side
    }

    /// Number of sites N²
    #[inline]
    pub fn n_sites(&self) -> usize {
        self.spins.len()
    }

    /// Row-major view of all spins
    #[inline]
    pub fn spins(&self) -> &[Spin] {
        &self.spins
    }

    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        (row % self.side) * self.side + col % self.side
    }

    /// Spin at `(row, col)`; both coordinates are taken modulo N.
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Spin {
        self.spins[self.index(row, col)]
    }

    /// Overwrite the spin at `(row, col)`; both coordinates are taken modulo N.
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, spin: Spin) {
        let idx = self.index(row, col);
        let old = std::mem::replace(&mut self.spins[idx], spin);
        self.spin_sum += (spin.value() - old.value()) as i64;
    }

    /// The four periodic neighbors in up, down, left, right order.
    ///
    /// For N <= 2 the list contains repeats (and for N = 1 the site itself):
    /// opposite offsets wrap onto the same cell, and each occurrence counts.
    pub fn neighbors(&self, row: usize, col: usize) -> [Site; 4] {
        let (row, col) = (row % self.side, col % self.side);
        NEIGHBOR_OFFSETS.map(|(dr, dc)| {
            Site::new(wrap(row, dr, self.side), wrap(col, dc, self.side))
        })
    }

    /// Sum of the four neighbor spins, repeats included
    #[inline]
    pub fn neighbor_sum(&self, row: usize, col: usize) -> i32 {
        self.neighbors(row, col)
            .iter()
            .map(|n| self.get(n.row, n.col).value() as i32)
            .sum()
    }

    /// Energy contribution of `(row, col)` if it held `spin`, against the
    /// current values of its four neighbors: `-H s - J s Σ s_nb`.
    pub fn local_energy(
        &self,
        row: usize,
        col: usize,
        spin: Spin,
        coupling: f64,
        field: f64,
    ) -> f64 {
        let s = spin.as_f64();
        let neighbors = self.neighbor_sum(row, col) as f64;
        -field * s - coupling * s * neighbors
    }

    /// `|Σ s| / N²`, always in `[0, 1]`.
    #[inline]
    pub fn magnetization(&self) -> f64 {
        self.signed_magnetization().abs()
    }

    /// `Σ s / N²`, in `[-1, 1]`.
    #[inline]
    pub fn signed_magnetization(&self) -> f64 {
        self.spin_sum as f64 / self.n_sites() as f64
    }

    /// Total spin `Σ s`
    #[inline]
    pub fn spin_sum(&self) -> i64 {
        self.spin_sum
    }

    /// Total energy, counting each site's right and down bond once.
    pub fn total_energy(&self, coupling: f64, field: f64) -> f64 {
        let mut energy = 0.0;
        for row in 0..self.side {
            for col in 0..self.side {
                let spin = self.get(row, col).as_f64();
                let right = self.get(row, col + 1).as_f64();
                let down = self.get(row + 1, col).as_f64();

                energy -= coupling * spin * (right + down);
                energy -= field * spin;
            }
        }
        energy
    }

    /// Total energy divided by N²
    pub fn energy_per_site(&self, coupling: f64, field: f64) -> f64 {
        self.total_energy(coupling, field) / self.n_sites() as f64
    }
}

impl fmt::Display for Lattice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.spins.chunks(self.side) {
            for spin in row {
                let arrow = match spin {
                    Spin::Up => "↑",
                    Spin::Down => "↓",
                };
                write!(f, "{:2}", arrow)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Number of sites N² of an N x N lattice.
///
/// Fails with `InvalidSize` for N = 0 and for N whose square overflows or
/// exceeds the largest allocation a `Vec` can hold.
pub fn site_count(side: usize) -> Result<usize, IsingError> {
    side.checked_mul(side)
        .filter(|&n| n > 0 && n <= isize::MAX as usize)
        .ok_or_else(|| IsingError::InvalidSize(i64::try_from(side).unwrap_or(i64::MAX)))
}
