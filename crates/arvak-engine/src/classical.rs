//! Classical variable storage backing `creg` declarations, measurement
//! targets and `if` conditions.

use std::collections::BTreeMap;

use arvak_qasm::{ClassicalRegisterTable, ClassicalType, Target};

/// Holds the current value of every classical bit, addressable by register
/// name and index.
#[derive(Debug, Clone, Default)]
pub struct ClassicalStore {
    values: BTreeMap<String, Vec<i64>>,
    types: BTreeMap<String, ClassicalType>,
}

impl ClassicalStore {
    /// Allocate zeroed storage for every register in `table`.
    #[must_use]
    pub fn from_table(table: &ClassicalRegisterTable) -> Self {
        let mut values = BTreeMap::new();
        let mut types = BTreeMap::new();
        for (name, size) in table.registers() {
            values.insert(name.to_string(), vec![0; size]);
            if let Some(ty) = table.type_of(name) {
                types.insert(name.to_string(), ty);
            }
        }
        Self { values, types }
    }

    /// The declared type of `name`'s register, or `None` if undeclared.
    #[must_use]
    pub fn type_of(&self, name: &str) -> Option<ClassicalType> {
        self.types.get(name).copied()
    }

    /// Whether `value` is representable by `ty` (spec §4.3.4 "type-checked
    /// against the declared variable"). [`ClassicalType::Bool`] accepts only
    /// 0/1; [`ClassicalType::Int`] and [`ClassicalType::Float`] accept any
    /// `i64`, since the store itself carries no fractional component.
    #[must_use]
    pub fn fits(ty: ClassicalType, value: i64) -> bool {
        match ty {
            ClassicalType::Bool => value == 0 || value == 1,
            ClassicalType::Int | ClassicalType::Float => true,
        }
    }

    /// The value of a single bit, or the whole register packed into an
    /// integer (index 0 = LSB) if `target` names the register as a whole.
    #[must_use]
    pub fn get(&self, target: &Target) -> Option<i64> {
        let bits = self.values.get(target.register_name())?;
        match target {
            Target::Indexed(_, idx) => bits.get(*idx).copied(),
            Target::Register(_) => Some(
                bits.iter()
                    .enumerate()
                    .fold(0i64, |acc, (i, &b)| acc | (b << i)),
            ),
        }
    }

    /// Set a single bit, or — for a whole-register target — unpack `value`
    /// across every bit of the register (index 0 = LSB). Returns the
    /// previous value at that exact target, for undo support.
    pub fn set(&mut self, target: &Target, value: i64) -> Option<i64> {
        let previous = self.get(target);
        let Some(bits) = self.values.get_mut(target.register_name()) else {
            return None;
        };
        match target {
            Target::Indexed(_, idx) => {
                if let Some(slot) = bits.get_mut(*idx) {
                    *slot = value;
                }
            }
            Target::Register(_) => {
                for (i, slot) in bits.iter_mut().enumerate() {
                    *slot = (value >> i) & 1;
                }
            }
        }
        previous
    }

    /// Evaluate an `if (cond)` condition string of the form
    /// `register==value` or a bare register name (truthy if nonzero).
    #[must_use]
    pub fn eval_condition(&self, condition: &str) -> bool {
        if let Some((lhs, rhs)) = condition.split_once("==") {
            let lhs = lhs.trim();
            let rhs: i64 = rhs.trim().parse().unwrap_or(0);
            let Some(target) = Target::parse(lhs) else { return false };
            self.get(&target) == Some(rhs)
        } else {
            let Some(target) = Target::parse(condition.trim()) else { return false };
            self.get(&target).unwrap_or(0) != 0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get_indexed_bit() {
        let mut table = ClassicalRegisterTable::default();
        table.declare("c", 2);
        let mut store = ClassicalStore::from_table(&table);
        store.set(&Target::Indexed("c".into(), 1), 1);
        assert_eq!(store.get(&Target::Indexed("c".into(), 1)), Some(1));
        assert_eq!(store.get(&Target::Indexed("c".into(), 0)), Some(0));
    }

    #[test]
    fn test_register_packs_bits_as_integer() {
        let mut table = ClassicalRegisterTable::default();
        table.declare("c", 2);
        let mut store = ClassicalStore::from_table(&table);
        store.set(&Target::Indexed("c".into(), 0), 1);
        store.set(&Target::Indexed("c".into(), 1), 1);
        assert_eq!(store.get(&Target::Register("c".into())), Some(3));
    }

    #[test]
    fn test_eval_condition_equality() {
        let mut table = ClassicalRegisterTable::default();
        table.declare("c", 1);
        let mut store = ClassicalStore::from_table(&table);
        store.set(&Target::Indexed("c".into(), 0), 1);
        assert!(store.eval_condition("c==1"));
        assert!(!store.eval_condition("c==0"));
    }

    #[test]
    fn test_type_of_reflects_declared_type() {
        let mut table = ClassicalRegisterTable::default();
        table.declare_typed("flag", 1, ClassicalType::Bool);
        let store = ClassicalStore::from_table(&table);
        assert_eq!(store.type_of("flag"), Some(ClassicalType::Bool));
        assert_eq!(store.type_of("missing"), None);
    }

    #[test]
    fn test_fits_bool_accepts_only_zero_or_one() {
        assert!(ClassicalStore::fits(ClassicalType::Bool, 0));
        assert!(ClassicalStore::fits(ClassicalType::Bool, 1));
        assert!(!ClassicalStore::fits(ClassicalType::Bool, 2));
        assert!(!ClassicalStore::fits(ClassicalType::Bool, -1));
    }

    #[test]
    fn test_fits_int_accepts_any_value() {
        assert!(ClassicalStore::fits(ClassicalType::Int, 42));
        assert!(ClassicalStore::fits(ClassicalType::Int, -42));
    }
}
