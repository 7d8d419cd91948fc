//! Reduced density matrices and the separability/superposition checks built
//! on them, used to evaluate `assert-ent` and `assert-sup` (spec §4).

use num_complex::Complex64;

use crate::complex_utils::DEFAULT_TOLERANCE;

/// The reduced density matrix over `keep` (ascending qubit indices), as a
/// row-major `dim × dim` matrix where `dim = 2^keep.len()`, obtained by
/// tracing out every other qubit of a pure state.
#[must_use]
pub fn partial_trace(amplitudes: &[Complex64], num_qubits: usize, keep: &[usize]) -> Vec<Complex64> {
    let dim = 1usize << keep.len();
    let mut rho = vec![Complex64::new(0.0, 0.0); dim * dim];
    let traced: Vec<usize> = (0..num_qubits).filter(|q| !keep.contains(q)).collect();
    let traced_dim = 1usize << traced.len();

    for row in 0..dim {
        for col in 0..dim {
            let mut sum = Complex64::new(0.0, 0.0);
            for t in 0..traced_dim {
                let full_row = compose_index(row, keep, t, &traced, num_qubits);
                let full_col = compose_index(col, keep, t, &traced, num_qubits);
                sum += amplitudes[full_row] * amplitudes[full_col].conj();
            }
            rho[row * dim + col] = sum;
        }
    }
    rho
}

/// Rebuild a full-width basis index from a `keep`-subsystem index and a
/// `traced`-subsystem index.
fn compose_index(keep_idx: usize, keep: &[usize], traced_idx: usize, traced: &[usize], num_qubits: usize) -> usize {
    let mut full = 0usize;
    for (bit, &q) in keep.iter().enumerate() {
        if keep_idx & (1 << bit) != 0 {
            full |= 1 << q;
        }
    }
    for (bit, &q) in traced.iter().enumerate() {
        if traced_idx & (1 << bit) != 0 {
            full |= 1 << q;
        }
    }
    let _ = num_qubits;
    full
}

/// `Tr(ρ²)`. Equal to 1 for a pure (unentangled-with-the-rest) reduced state
/// and strictly less than 1 whenever the subsystem is entangled with
/// whatever was traced out.
#[must_use]
pub fn purity(rho: &[Complex64], dim: usize) -> f64 {
    let mut acc = Complex64::new(0.0, 0.0);
    for i in 0..dim {
        for j in 0..dim {
            acc += rho[i * dim + j] * rho[j * dim + i];
        }
    }
    acc.re
}

/// Whether `qubits` are entangled with the rest of the register: the
/// marginal state over `qubits` is mixed, so it cannot be factored out of
/// the global pure state.
#[must_use]
pub fn is_entangled_with_rest(amplitudes: &[Complex64], num_qubits: usize, qubits: &[usize]) -> bool {
    if qubits.len() >= num_qubits {
        return false;
    }
    let dim = 1usize << qubits.len();
    let rho = partial_trace(amplitudes, num_qubits, qubits);
    purity(&rho, dim) < 1.0 - DEFAULT_TOLERANCE
}

/// Whether `targets`, taken as a closed universe, are mutually entangled:
/// every non-trivial bipartition of `targets` must itself carry non-zero
/// mutual dependency. Unlike [`is_entangled_with_rest`], qubits outside
/// `targets` play no part — two qubits each entangled with some *other*
/// qubit elsewhere in the register, but not with each other, are reported
/// as not entangled here.
#[must_use]
pub fn is_entangled_within(amplitudes: &[Complex64], num_qubits: usize, targets: &[usize]) -> bool {
    let k = targets.len();
    if k < 2 {
        return false;
    }
    let rho = partial_trace(amplitudes, num_qubits, targets);
    for mask in 1..(1u32 << k) - 1 {
        let side: Vec<usize> = (0..k).filter(|b| mask & (1 << b) != 0).collect();
        let dim = 1usize << side.len();
        let marginal = partial_trace_density(&rho, k, &side);
        if purity(&marginal, dim) >= 1.0 - DEFAULT_TOLERANCE {
            return false;
        }
    }
    true
}

/// Partial trace of a `dim × dim` density matrix (`dim = 2^universe_len`)
/// down to the bit positions in `keep`, used to check bipartitions within
/// an already-reduced subsystem rather than the full register.
fn partial_trace_density(rho: &[Complex64], universe_len: usize, keep: &[usize]) -> Vec<Complex64> {
    let keep_dim = 1usize << keep.len();
    let full_dim = 1usize << universe_len;
    let traced: Vec<usize> = (0..universe_len).filter(|b| !keep.contains(b)).collect();
    let traced_dim = 1usize << traced.len();

    let mut out = vec![Complex64::new(0.0, 0.0); keep_dim * keep_dim];
    for row in 0..keep_dim {
        for col in 0..keep_dim {
            let mut sum = Complex64::new(0.0, 0.0);
            for t in 0..traced_dim {
                let full_row = compose_index(row, keep, t, &traced, universe_len);
                let full_col = compose_index(col, keep, t, &traced, universe_len);
                sum += rho[full_row * full_dim + full_col];
            }
            out[row * keep_dim + col] = sum;
        }
    }
    out
}

/// Whether `qubits`, taken together, hold a superposition rather than a
/// single computational basis state: true unless exactly one diagonal entry
/// of their marginal density matrix carries essentially all the weight.
#[must_use]
pub fn is_superposition(amplitudes: &[Complex64], num_qubits: usize, qubits: &[usize]) -> bool {
    let dim = 1usize << qubits.len();
    let rho = partial_trace(amplitudes, num_qubits, qubits);
    !(0..dim).any(|i| (rho[i * dim + i].re - 1.0).abs() < DEFAULT_TOLERANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;

    fn bell_state() -> Vec<Complex64> {
        vec![
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(FRAC_1_SQRT_2, 0.0),
        ]
    }

    #[test]
    fn test_bell_state_both_qubits_entangled() {
        let amps = bell_state();
        assert!(is_entangled_with_rest(&amps, 2, &[0]));
        assert!(is_entangled_with_rest(&amps, 2, &[1]));
    }

    #[test]
    fn test_product_state_not_entangled() {
        // |+>|0> = H on qubit 0 only.
        let amps = vec![
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::new(FRAC_1_SQRT_2, 0.0),
            Complex64::new(0.0, 0.0),
            Complex64::new(0.0, 0.0),
        ];
        assert!(!is_entangled_with_rest(&amps, 2, &[0]));
        assert!(!is_entangled_with_rest(&amps, 2, &[1]));
    }

    #[test]
    fn test_basis_state_not_superposition() {
        let amps = vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
        assert!(!is_superposition(&amps, 1, &[0]));
    }

    #[test]
    fn test_plus_state_is_superposition() {
        let amps = vec![Complex64::new(FRAC_1_SQRT_2, 0.0), Complex64::new(FRAC_1_SQRT_2, 0.0)];
        assert!(is_superposition(&amps, 1, &[0]));
    }

    fn two_independent_bell_pairs() -> Vec<Complex64> {
        // (|00>+|11>)/sqrt2 on (q0,q1) tensor (|00>+|11>)/sqrt2 on (q2,q3).
        let mut amps = vec![Complex64::new(0.0, 0.0); 16];
        for idx in [0usize, 3, 12, 15] {
            amps[idx] = Complex64::new(0.5, 0.0);
        }
        amps
    }

    #[test]
    fn test_entangled_within_own_pair() {
        let amps = two_independent_bell_pairs();
        assert!(is_entangled_within(&amps, 4, &[0, 1]));
        assert!(is_entangled_within(&amps, 4, &[2, 3]));
    }

    #[test]
    fn test_not_entangled_within_across_independent_pairs() {
        let amps = two_independent_bell_pairs();
        assert!(!is_entangled_within(&amps, 4, &[0, 2]));
        assert!(!is_entangled_within(&amps, 4, &[1, 3]));
    }

    #[test]
    fn test_entangled_within_requires_at_least_two_targets() {
        let amps = two_independent_bell_pairs();
        assert!(!is_entangled_within(&amps, 4, &[0]));
    }

    #[test]
    fn test_bell_state_marginal_is_superposition() {
        let amps = bell_state();
        assert!(is_superposition(&amps, 2, &[0]));
    }
}
