//! Orchestrates compilation passes by optimization level, the same
//! `PassManager` idiom the transpiler pipeline used, retargeted to the
//! small pass list this spec's compile step actually needs.

use crate::emit::EmittedItem;
use crate::error::CompileResult;
use crate::pass::Pass;
use crate::passes::CoalesceDisjointQubits;

pub struct PassManager {
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    #[must_use]
    pub fn for_opt_level(opt: u8) -> Self {
        let mut passes: Vec<Box<dyn Pass>> = Vec::new();
        if opt >= 1 {
            passes.push(Box::new(CoalesceDisjointQubits));
        }
        Self { passes }
    }

    pub fn run(&self, items: &mut Vec<EmittedItem>) -> CompileResult<()> {
        for pass in &self.passes {
            if pass.should_run(items) {
                tracing::debug!(pass = pass.name(), "running compile pass");
                pass.run(items)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opt_zero_has_no_passes() {
        let manager = PassManager::for_opt_level(0);
        assert!(manager.passes.is_empty());
    }

    #[test]
    fn test_opt_one_includes_coalesce() {
        let manager = PassManager::for_opt_level(1);
        assert_eq!(manager.passes.len(), 1);
    }
}
