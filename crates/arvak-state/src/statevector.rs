//! The statevector backend: the `apply_gate` / `apply_inverse` / `measure` /
//! `restore` / `amplitude` / `partial_trace` surface the engine drives
//! (spec §6 backend capability contract).

use std::f64::consts::PI;

use arvak_ir::{Gate, GateKind, ParameterExpression, StandardGate};
use num_complex::Complex64;
use rand::Rng;

use crate::complex_utils::{self, DEFAULT_TOLERANCE};
use crate::density;
use crate::error::{StateError, StateResult};

/// A pure quantum state over `num_qubits` qubits, stored as `2^num_qubits`
/// complex amplitudes indexed so bit `k` of the index is qubit `k`.
#[derive(Debug, Clone)]
pub struct Statevector {
    amplitudes: Vec<Complex64>,
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to `|0...0⟩`.
    #[must_use]
    pub fn new(num_qubits: usize) -> Self {
        let size = 1usize << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self { amplitudes, num_qubits }
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Read-only access to the full amplitude vector.
    #[must_use]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    /// The amplitude of a single basis state, or `None` if `index` is out of
    /// range.
    #[must_use]
    pub fn amplitude(&self, index: usize) -> Option<Complex64> {
        self.amplitudes.get(index).copied()
    }

    /// Directly overwrite one amplitude (used by
    /// `change_amplitude_value`/direct state mutation in the engine). The
    /// vector is renormalized afterward so the state stays physical.
    pub fn set_amplitude(&mut self, index: usize, value: Complex64) -> StateResult<()> {
        let amp = self
            .amplitudes
            .get_mut(index)
            .ok_or(StateError::QubitOutOfRange { qubit: index, num_qubits: self.num_qubits })?;
        *amp = value;
        complex_utils::normalize(&mut self.amplitudes);
        Ok(())
    }

    /// An opaque snapshot of the current state, for restoring across
    /// irreversible operations (measurement, reset).
    #[must_use]
    pub fn snapshot(&self) -> Vec<Complex64> {
        self.amplitudes.clone()
    }

    /// Restore a previously captured snapshot.
    pub fn restore(&mut self, snapshot: &[Complex64]) -> StateResult<()> {
        if snapshot.len() != self.amplitudes.len() {
            return Err(StateError::DimensionMismatch {
                expected: self.amplitudes.len(),
                got: snapshot.len(),
            });
        }
        self.amplitudes.copy_from_slice(snapshot);
        Ok(())
    }

    /// Verify the state is still normalized within tolerance.
    pub fn check_normalized(&self) -> StateResult<()> {
        let n = complex_utils::norm(&self.amplitudes);
        if (n - 1.0).abs() > DEFAULT_TOLERANCE {
            return Err(StateError::NormalizationError { norm: n, tolerance: DEFAULT_TOLERANCE });
        }
        Ok(())
    }

    /// Reduced density matrix over `qubits` (spec §6 backend contract).
    #[must_use]
    pub fn partial_trace(&self, qubits: &[usize]) -> Vec<Complex64> {
        density::partial_trace(&self.amplitudes, self.num_qubits, qubits)
    }

    /// Apply a gate to the given qubits, in the order the dialect lists
    /// them (control(s) first, then target(s)).
    pub fn apply_gate(&mut self, gate: &Gate, qubits: &[usize]) -> StateResult<()> {
        tracing::trace!(gate = gate.name(), ?qubits, "applying gate");
        self.check_arity(gate, qubits)?;
        match &gate.kind {
            GateKind::Standard(std_gate) => self.apply_standard(std_gate, qubits, false),
            GateKind::Custom(_) => Err(StateError::Ir(arvak_ir::IrError::UnboundParameter(
                gate.name().to_string(),
            ))),
        }
    }

    /// Apply the analytic inverse of a gate. Every standard gate used by the
    /// dialect is unitary with a closed-form inverse, so reversible stepping
    /// never needs a stored history entry for gate application (only for
    /// measurement).
    pub fn apply_inverse(&mut self, gate: &Gate, qubits: &[usize]) -> StateResult<()> {
        self.check_arity(gate, qubits)?;
        match &gate.kind {
            GateKind::Standard(std_gate) => self.apply_standard(std_gate, qubits, true),
            GateKind::Custom(_) => Err(StateError::Ir(arvak_ir::IrError::UnboundParameter(
                gate.name().to_string(),
            ))),
        }
    }

    fn check_arity(&self, gate: &Gate, qubits: &[usize]) -> StateResult<()> {
        if gate.num_qubits() as usize != qubits.len() {
            return Err(StateError::QubitCountMismatch {
                gate_name: gate.name().to_string(),
                expected: gate.num_qubits(),
                got: qubits.len() as u32,
            });
        }
        for &q in qubits {
            if q >= self.num_qubits {
                return Err(StateError::QubitOutOfRange { qubit: q, num_qubits: self.num_qubits });
            }
        }
        Ok(())
    }

    fn apply_standard(&mut self, gate: &StandardGate, qubits: &[usize], inverse: bool) -> StateResult<()> {
        let angle = |p: &ParameterExpression| -> StateResult<f64> {
            p.as_f64().ok_or_else(|| StateError::UnboundParameter(p.to_string()))
        };
        let sign = if inverse { -1.0 } else { 1.0 };

        match gate {
            StandardGate::I => {}
            StandardGate::X => self.apply_x(qubits[0]),
            StandardGate::Y => self.apply_y(qubits[0]),
            StandardGate::Z => self.apply_z(qubits[0]),
            StandardGate::H => self.apply_h(qubits[0]),
            StandardGate::S => self.apply_phase(qubits[0], sign * PI / 2.0),
            StandardGate::Sdg => self.apply_phase(qubits[0], -sign * PI / 2.0),
            StandardGate::T => self.apply_phase(qubits[0], sign * PI / 4.0),
            StandardGate::Tdg => self.apply_phase(qubits[0], -sign * PI / 4.0),
            StandardGate::SX => self.apply_rx(qubits[0], sign * PI / 2.0),
            StandardGate::SXdg => self.apply_rx(qubits[0], -sign * PI / 2.0),
            StandardGate::Rx(theta) => self.apply_rx(qubits[0], sign * angle(theta)?),
            StandardGate::Ry(theta) => self.apply_ry(qubits[0], sign * angle(theta)?),
            StandardGate::Rz(theta) => self.apply_rz(qubits[0], sign * angle(theta)?),
            StandardGate::P(theta) => self.apply_phase(qubits[0], sign * angle(theta)?),
            StandardGate::U(theta, phi, lambda) => {
                let (t, p, l) = (angle(theta)?, angle(phi)?, angle(lambda)?);
                if inverse {
                    self.apply_u(qubits[0], -t, -l, -p);
                } else {
                    self.apply_u(qubits[0], t, p, l);
                }
            }
            StandardGate::PRX(theta, phi) => {
                let (t, p) = (angle(theta)?, angle(phi)?);
                self.apply_rz(qubits[0], -p);
                self.apply_rx(qubits[0], sign * t);
                self.apply_rz(qubits[0], p);
            }

            StandardGate::CX => self.apply_cx(qubits[0], qubits[1]),
            StandardGate::CY => self.apply_cy(qubits[0], qubits[1]),
            StandardGate::CZ => self.apply_cz(qubits[0], qubits[1]),
            StandardGate::CH => self.apply_ch(qubits[0], qubits[1]),
            StandardGate::Swap => self.apply_swap(qubits[0], qubits[1]),
            StandardGate::ISwap => {
                if inverse {
                    self.apply_iswap_dag(qubits[0], qubits[1]);
                } else {
                    self.apply_iswap(qubits[0], qubits[1]);
                }
            }
            StandardGate::CRx(theta) => self.apply_crx(qubits[0], qubits[1], sign * angle(theta)?),
            StandardGate::CRy(theta) => self.apply_cry(qubits[0], qubits[1], sign * angle(theta)?),
            StandardGate::CRz(theta) => self.apply_crz(qubits[0], qubits[1], sign * angle(theta)?),
            StandardGate::CP(theta) => self.apply_cp(qubits[0], qubits[1], sign * angle(theta)?),
            StandardGate::RXX(theta) => self.apply_rxx(qubits[0], qubits[1], sign * angle(theta)?),
            StandardGate::RYY(theta) => self.apply_ryy(qubits[0], qubits[1], sign * angle(theta)?),
            StandardGate::RZZ(theta) => self.apply_rzz(qubits[0], qubits[1], sign * angle(theta)?),

            StandardGate::CCX => self.apply_ccx(qubits[0], qubits[1], qubits[2]),
            StandardGate::CSwap => self.apply_cswap(qubits[0], qubits[1], qubits[2]),
        }
        Ok(())
    }

    /// Collapse the state by measuring `qubit` in the computational basis,
    /// sampled by the Born rule. Returns the classical outcome; callers that
    /// need to step backward across a measurement must snapshot beforehand
    /// since this step is not unitary.
    pub fn measure(&mut self, qubit: usize) -> StateResult<u8> {
        if qubit >= self.num_qubits {
            return Err(StateError::QubitOutOfRange { qubit, num_qubits: self.num_qubits });
        }
        let mask = 1usize << qubit;
        let mut prob_one = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            if i & mask != 0 {
                prob_one += amp.norm_sqr();
            }
        }
        let outcome = if rand::thread_rng().r#gen::<f64>() < prob_one { 1u8 } else { 0u8 };
        self.collapse(qubit, outcome);
        Ok(outcome)
    }

    /// Force-collapse `qubit` to `outcome` and renormalize, without sampling
    /// (used by deterministic replay and `reset`).
    pub fn collapse(&mut self, qubit: usize, outcome: u8) {
        let mask = 1usize << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let bit = u8::from(i & mask != 0);
            if bit != outcome {
                *amp = Complex64::new(0.0, 0.0);
            }
        }
        complex_utils::normalize(&mut self.amplitudes);
    }

    /// Reset a qubit to `|0⟩`: measure it, then flip it back to `|0⟩` if it
    /// collapsed to `|1⟩`.
    pub fn reset(&mut self, qubit: usize) -> StateResult<()> {
        let outcome = self.measure(qubit)?;
        if outcome == 1 {
            self.apply_x(qubit);
        }
        Ok(())
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                self.amplitudes.swap(i, i | mask);
            }
        }
    }

    fn apply_y(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let iu = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -iu * self.amplitudes[j];
                self.amplitudes[j] = iu * tmp;
            }
        }
    }

    fn apply_z(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_h(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = inv_sqrt2 * (a + b);
                self.amplitudes[j] = inv_sqrt2 * (a - b);
            }
        }
    }

    fn apply_phase(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & mask != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rx(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
            }
        }
    }

    fn apply_ry(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
            }
        }
    }

    fn apply_rz(&mut self, qubit: usize, theta: f64) {
        let mask = 1 << qubit;
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            *amp *= if i & mask == 0 { phase_0 } else { phase_1 };
        }
    }

    fn apply_u(&mut self, qubit: usize, theta: f64, phi: f64, lambda: f64) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let e_il = Complex64::from_polar(1.0, lambda);
        let e_ip = Complex64::from_polar(1.0, phi);
        let e_ipl = Complex64::from_polar(1.0, phi + lambda);
        for i in 0..self.amplitudes.len() {
            if i & mask == 0 {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - e_il * s * b;
                self.amplitudes[j] = e_ip * s * a + e_ipl * c * b;
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let (cm, tm) = (1 << control, 1 << target);
        for i in 0..self.amplitudes.len() {
            if i & cm != 0 && i & tm == 0 {
                self.amplitudes.swap(i, i | tm);
            }
        }
    }

    fn apply_cy(&mut self, control: usize, target: usize) {
        let (cm, tm) = (1 << control, 1 << target);
        let iu = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & cm != 0 && i & tm == 0 {
                let j = i | tm;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = -iu * self.amplitudes[j];
                self.amplitudes[j] = iu * tmp;
            }
        }
    }

    fn apply_cz(&mut self, control: usize, target: usize) {
        let (cm, tm) = (1 << control, 1 << target);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & cm != 0 && i & tm != 0 {
                *amp = -*amp;
            }
        }
    }

    fn apply_ch(&mut self, control: usize, target: usize) {
        let (cm, tm) = (1 << control, 1 << target);
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        for i in 0..self.amplitudes.len() {
            if i & cm != 0 && i & tm == 0 {
                let j = i | tm;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = inv_sqrt2 * (a + b);
                self.amplitudes[j] = inv_sqrt2 * (a - b);
            }
        }
    }

    fn apply_swap(&mut self, q1: usize, q2: usize) {
        let (m1, m2) = (1 << q1, 1 << q2);
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 {
                let j = (i & !m1) | m2;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_iswap(&mut self, q1: usize, q2: usize) {
        let (m1, m2) = (1 << q1, 1 << q2);
        let iu = Complex64::new(0.0, 1.0);
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 {
                let j = (i & !m1) | m2;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = iu * self.amplitudes[j];
                self.amplitudes[j] = iu * tmp;
            }
        }
    }

    fn apply_iswap_dag(&mut self, q1: usize, q2: usize) {
        let (m1, m2) = (1 << q1, 1 << q2);
        let neg_iu = Complex64::new(0.0, -1.0);
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 == 0 {
                let j = (i & !m1) | m2;
                let tmp = self.amplitudes[i];
                self.amplitudes[i] = neg_iu * self.amplitudes[j];
                self.amplitudes[j] = neg_iu * tmp;
            }
        }
    }

    fn apply_crx(&mut self, control: usize, target: usize, theta: f64) {
        let cm = 1 << control;
        let on = (0..self.amplitudes.len()).filter(|i| i & cm != 0).collect::<Vec<_>>();
        self.apply_rx_on_subset(target, theta, &on);
    }

    fn apply_cry(&mut self, control: usize, target: usize, theta: f64) {
        let cm = 1 << control;
        let on = (0..self.amplitudes.len()).filter(|i| i & cm != 0).collect::<Vec<_>>();
        self.apply_ry_on_subset(target, theta, &on);
    }

    fn apply_rx_on_subset(&mut self, qubit: usize, theta: f64, indices: &[usize]) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        let mut done = vec![false; self.amplitudes.len()];
        for &i in indices {
            if i & mask == 0 && !done[i] {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a + neg_i_s * b;
                self.amplitudes[j] = neg_i_s * a + c * b;
                done[i] = true;
                done[j] = true;
            }
        }
    }

    fn apply_ry_on_subset(&mut self, qubit: usize, theta: f64, indices: &[usize]) {
        let mask = 1 << qubit;
        let c = (theta / 2.0).cos();
        let s = (theta / 2.0).sin();
        let mut done = vec![false; self.amplitudes.len()];
        for &i in indices {
            if i & mask == 0 && !done[i] {
                let j = i | mask;
                let a = self.amplitudes[i];
                let b = self.amplitudes[j];
                self.amplitudes[i] = c * a - s * b;
                self.amplitudes[j] = s * a + c * b;
                done[i] = true;
                done[j] = true;
            }
        }
    }

    fn apply_crz(&mut self, control: usize, target: usize, theta: f64) {
        let (cm, tm) = (1 << control, 1 << target);
        let phase_0 = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_1 = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & cm != 0 {
                *amp *= if i & tm == 0 { phase_0 } else { phase_1 };
            }
        }
    }

    fn apply_cp(&mut self, control: usize, target: usize, theta: f64) {
        let (cm, tm) = (1 << control, 1 << target);
        let phase = Complex64::from_polar(1.0, theta);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            if i & cm != 0 && i & tm != 0 {
                *amp *= phase;
            }
        }
    }

    fn apply_rxx(&mut self, q1: usize, q2: usize, theta: f64) {
        self.apply_two_body_rotation(q1, q2, theta, |a, b| (a, b));
    }

    fn apply_ryy(&mut self, q1: usize, q2: usize, theta: f64) {
        self.apply_two_body_rotation(q1, q2, theta, |a, b| (-a, b));
    }

    fn apply_rzz(&mut self, q1: usize, q2: usize, theta: f64) {
        let (m1, m2) = (1 << q1, 1 << q2);
        let phase_even = Complex64::from_polar(1.0, -theta / 2.0);
        let phase_odd = Complex64::from_polar(1.0, theta / 2.0);
        for (i, amp) in self.amplitudes.iter_mut().enumerate() {
            let parity = ((i & m1 != 0) as u8) ^ ((i & m2 != 0) as u8);
            *amp *= if parity == 0 { phase_even } else { phase_odd };
        }
    }

    /// Shared structure for `RXX`/`RYY`: both mix the `00`/`11` and `01`/`10`
    /// subspaces of `q1,q2`; `sign_map` distinguishes the two by flipping
    /// the cross term's sign for `RYY`.
    fn apply_two_body_rotation(
        &mut self,
        q1: usize,
        q2: usize,
        theta: f64,
        sign_map: impl Fn(Complex64, Complex64) -> (Complex64, Complex64),
    ) {
        let (m1, m2) = (1 << q1, 1 << q2);
        let c = (theta / 2.0).cos();
        let neg_i_s = Complex64::new(0.0, -(theta / 2.0).sin());
        let mut done = vec![false; self.amplitudes.len()];
        for i in 0..self.amplitudes.len() {
            if done[i] {
                continue;
            }
            let partner = i ^ m1 ^ m2;
            if partner == i || done[partner] {
                continue;
            }
            let a = self.amplitudes[i];
            let b = self.amplitudes[partner];
            let (a_term, b_term) = sign_map(neg_i_s * b, neg_i_s * a);
            self.amplitudes[i] = c * a + a_term;
            self.amplitudes[partner] = c * b + b_term;
            done[i] = true;
            done[partner] = true;
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let (m1, m2, mt) = (1 << c1, 1 << c2, 1 << target);
        for i in 0..self.amplitudes.len() {
            if i & m1 != 0 && i & m2 != 0 && i & mt == 0 {
                self.amplitudes.swap(i, i | mt);
            }
        }
    }

    fn apply_cswap(&mut self, control: usize, t1: usize, t2: usize) {
        let (cm, m1, m2) = (1 << control, 1 << t1, 1 << t2);
        for i in 0..self.amplitudes.len() {
            if i & cm != 0 && i & m1 != 0 && i & m2 == 0 {
                let j = (i & !m1) | m2;
                self.amplitudes.swap(i, j);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arvak_ir::Gate;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitude(0).unwrap(), Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitude(3).unwrap(), Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_bell_state() {
        let mut sv = Statevector::new(2);
        sv.apply_gate(&Gate::standard(StandardGate::H), &[0]).unwrap();
        sv.apply_gate(&Gate::standard(StandardGate::CX), &[0, 1]).unwrap();
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitude(0).unwrap(), Complex64::new(inv_sqrt2, 0.0)));
        assert!(approx_eq(sv.amplitude(3).unwrap(), Complex64::new(inv_sqrt2, 0.0)));
        assert!(approx_eq(sv.amplitude(1).unwrap(), Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_apply_then_inverse_returns_to_start() {
        let mut sv = Statevector::new(2);
        let gate = Gate::standard(StandardGate::Ry(ParameterExpression::constant(0.73)));
        sv.apply_gate(&gate, &[0]).unwrap();
        sv.apply_gate(&Gate::standard(StandardGate::CX), &[0, 1]).unwrap();
        sv.apply_inverse(&Gate::standard(StandardGate::CX), &[0, 1]).unwrap();
        sv.apply_inverse(&gate, &[0]).unwrap();
        assert!(approx_eq(sv.amplitude(0).unwrap(), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_measure_collapses_to_eigenstate() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&Gate::standard(StandardGate::X), &[0]).unwrap();
        let outcome = sv.measure(0).unwrap();
        assert_eq!(outcome, 1);
        assert!(approx_eq(sv.amplitude(1).unwrap(), Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_snapshot_restore_roundtrip() {
        let mut sv = Statevector::new(1);
        sv.apply_gate(&Gate::standard(StandardGate::H), &[0]).unwrap();
        let snap = sv.snapshot();
        sv.apply_gate(&Gate::standard(StandardGate::X), &[0]).unwrap();
        sv.restore(&snap).unwrap();
        let inv_sqrt2 = std::f64::consts::FRAC_1_SQRT_2;
        assert!(approx_eq(sv.amplitude(0).unwrap(), Complex64::new(inv_sqrt2, 0.0)));
    }

    #[test]
    fn test_wrong_arity_errors() {
        let mut sv = Statevector::new(2);
        let err = sv.apply_gate(&Gate::standard(StandardGate::X), &[0, 1]);
        assert!(err.is_err());
    }
}
