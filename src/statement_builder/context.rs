use crate::sql_tree::{ParameterNode, ParameterValue, SqlTreeError, TableAliasGenerator, PARAMETER_SIGIL};

/// Hands out `@p1, @p2, ...` in translation order.
#[derive(Debug, Default)]
pub(crate) struct ParameterGenerator {
    last_index: usize,
}

impl ParameterGenerator {
    pub fn next(&mut self, value: ParameterValue) -> Result<ParameterNode, SqlTreeError> {
        self.last_index += 1;
        ParameterNode::new(format!("{}p{}", PARAMETER_SIGIL, self.last_index), value)
    }
}

/// Counters that live for exactly one translation call.
#[derive(Debug, Default)]
pub(crate) struct TranslationContext {
    pub aliases: TableAliasGenerator,
    pub parameters: ParameterGenerator,
}

impl TranslationContext {
    pub fn next_alias(&mut self) -> String {
        let alias = self.aliases.next_alias();
        log::trace!("Allocated table alias {}", alias);
        alias
    }

    pub fn next_parameter(&mut self, value: ParameterValue) -> Result<ParameterNode, SqlTreeError> {
        self.parameters.next(value)
    }
}
