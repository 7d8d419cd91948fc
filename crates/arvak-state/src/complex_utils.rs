//! Complex arithmetic and amplitude-vector utilities shared by the
//! statevector backend and the assertion evaluators in `arvak-diag`.

use num_complex::Complex64;

/// Default tolerance used when two amplitudes or probabilities are compared
/// for near-equality throughout the debugger.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Whether two complex numbers are within `tolerance` of each other.
#[must_use]
pub fn approx_eq(a: Complex64, b: Complex64, tolerance: f64) -> bool {
    (a - b).norm() <= tolerance
}

/// Whether two complex numbers are within [`DEFAULT_TOLERANCE`] of each other.
#[must_use]
pub fn is_close(a: Complex64, b: Complex64) -> bool {
    approx_eq(a, b, DEFAULT_TOLERANCE)
}

/// The L2 norm of an amplitude vector.
#[must_use]
pub fn norm(amplitudes: &[Complex64]) -> f64 {
    amplitudes.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
}

/// Rescale an amplitude vector in place so its norm is 1.
///
/// No-op if the vector's norm is already within [`DEFAULT_TOLERANCE`] of
/// zero (the vector is left untouched rather than dividing by ~0).
pub fn normalize(amplitudes: &mut [Complex64]) {
    let n = norm(amplitudes);
    if n > DEFAULT_TOLERANCE {
        for amp in amplitudes.iter_mut() {
            *amp /= n;
        }
    }
}

/// The Hermitian inner product `⟨a|b⟩` of two equal-length amplitude vectors.
#[must_use]
pub fn inner_product(a: &[Complex64], b: &[Complex64]) -> Complex64 {
    a.iter().zip(b).map(|(x, y)| x.conj() * y).sum()
}

/// Fidelity `|⟨a|b⟩|²` between two equal-length amplitude vectors.
#[must_use]
pub fn fidelity(a: &[Complex64], b: &[Complex64]) -> f64 {
    inner_product(a, b).norm_sqr()
}

/// The global phase of the first amplitude with non-negligible magnitude, or
/// `None` if every amplitude is within tolerance of zero.
#[must_use]
pub fn reference_phase(amplitudes: &[Complex64], tolerance: f64) -> Option<f64> {
    amplitudes
        .iter()
        .find(|a| a.norm() > tolerance)
        .map(|a| Complex64::arg(*a))
}

/// Compare two amplitude vectors up to a global phase, as `assert-eq`/
/// `assert-ineq` do (spec §4): rotate `actual` by the phase that aligns its
/// first significant amplitude with `expected`'s, then compare component-wise.
#[must_use]
pub fn equal_up_to_global_phase(expected: &[Complex64], actual: &[Complex64], tolerance: f64) -> bool {
    if expected.len() != actual.len() {
        return false;
    }
    let (Some(e_phase), Some(a_phase)) = (
        reference_phase(expected, tolerance),
        reference_phase(actual, tolerance),
    ) else {
        return expected.iter().zip(actual).all(|(e, a)| approx_eq(*e, *a, tolerance));
    };
    let correction = Complex64::from_polar(1.0, e_phase - a_phase);
    expected
        .iter()
        .zip(actual)
        .all(|(e, a)| approx_eq(*e, a * correction, tolerance))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_scales_to_unit_norm() {
        let mut amps = vec![Complex64::new(2.0, 0.0), Complex64::new(0.0, 2.0)];
        normalize(&mut amps);
        assert!((norm(&amps) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_fidelity_identical_states_is_one() {
        let a = vec![Complex64::new(1.0, 0.0) / 2f64.sqrt(), Complex64::new(1.0, 0.0) / 2f64.sqrt()];
        assert!((fidelity(&a, &a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_equal_up_to_global_phase() {
        let expected = vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        let actual = vec![Complex64::new(0.0, 1.0), Complex64::new(0.0, 0.0)];
        assert!(equal_up_to_global_phase(&expected, &actual, 1e-9));
    }

    #[test]
    fn test_not_equal_different_states() {
        let expected = vec![Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0)];
        let actual = vec![Complex64::new(0.0, 0.0), Complex64::new(1.0, 0.0)];
        assert!(!equal_up_to_global_phase(&expected, &actual, 1e-9));
    }
}
