//! Coalesces consecutive single-qubit gates on disjoint qubits onto shared
//! lines (spec §4.5, `opt >= 1`). Purely a layout transformation: gates on
//! disjoint qubits commute, so reflowing them onto one line changes nothing
//! observable.

use std::collections::BTreeSet;

use crate::emit::EmittedItem;
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};

pub struct CoalesceDisjointQubits;

impl Pass for CoalesceDisjointQubits {
    fn name(&self) -> &'static str {
        "coalesce_disjoint_qubits"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, items: &mut Vec<EmittedItem>) -> CompileResult<()> {
        let mut result = Vec::with_capacity(items.len());
        let mut run: Vec<(String, usize)> = Vec::new();
        let mut touched: BTreeSet<usize> = BTreeSet::new();

        for item in items.drain(..) {
            match item {
                EmittedItem::Gate { text, qubit } => {
                    if touched.contains(&qubit) {
                        flush(&mut run, &mut result);
                        touched.clear();
                    }
                    touched.insert(qubit);
                    run.push((text, qubit));
                }
                other => {
                    flush(&mut run, &mut result);
                    touched.clear();
                    result.push(other);
                }
            }
        }
        flush(&mut run, &mut result);

        *items = result;
        Ok(())
    }

    fn should_run(&self, items: &[EmittedItem]) -> bool {
        items.iter().filter(|i| matches!(i, EmittedItem::Gate { .. })).count() > 1
    }
}

fn flush(run: &mut Vec<(String, usize)>, result: &mut Vec<EmittedItem>) {
    match run.len() {
        0 => {}
        1 => {
            let (text, qubit) = run.remove(0);
            result.push(EmittedItem::Gate { text, qubit });
        }
        _ => {
            let texts: Vec<String> = run.drain(..).map(|(text, _)| text).collect();
            result.push(EmittedItem::Line(format!("{};", texts.join("; "))));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gate(text: &str, qubit: usize) -> EmittedItem {
        EmittedItem::Gate { text: text.to_string(), qubit }
    }

    #[test]
    fn test_coalesces_disjoint_run() {
        let mut items = vec![gate("h q[0]", 0), gate("x q[1]", 1), gate("y q[2]", 2)];
        CoalesceDisjointQubits.run(&mut items).unwrap();
        assert_eq!(items.len(), 1);
        assert!(matches!(&items[0], EmittedItem::Line(t) if t == "h q[0]; x q[1]; y q[2];"));
    }

    #[test]
    fn test_repeated_qubit_breaks_run() {
        let mut items = vec![gate("h q[0]", 0), gate("x q[0]", 0)];
        CoalesceDisjointQubits.run(&mut items).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn test_non_gate_item_breaks_run() {
        let mut items =
            vec![gate("h q[0]", 0), EmittedItem::Line("barrier q;".into()), gate("x q[1]", 1)];
        CoalesceDisjointQubits.run(&mut items).unwrap();
        assert_eq!(items.len(), 3);
    }
}
