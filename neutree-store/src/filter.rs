//! PostgREST-style column-path filter construction (spec.md §6: "list
//! supports column-path filters like `metadata->name eq \"x\"`").

/// One `column->path=op.value` query-string component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub column: String,
    pub path: Option<String>,
    pub op: FilterOp,
    pub value: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterOp {
    Eq,
    Neq,
    Is,
}

impl FilterOp {
    fn as_str(self) -> &'static str {
        match self {
            FilterOp::Eq => "eq",
            FilterOp::Neq => "neq",
            FilterOp::Is => "is",
        }
    }
}

impl Filter {
    pub fn eq(column: impl Into<String>, path: Option<&str>, value: impl Into<String>) -> Self {
        Filter {
            column: column.into(),
            path: path.map(str::to_string),
            op: FilterOp::Eq,
            value: value.into(),
        }
    }

    pub fn workspace_eq(workspace: &str) -> Self {
        Filter::eq("metadata", Some("workspace"), workspace)
    }

    pub fn name_eq(name: &str) -> Self {
        Filter::eq("metadata", Some("name"), name)
    }

    pub fn is_not_deleted() -> Self {
        Filter {
            column: "metadata".to_string(),
            path: Some("deletion_timestamp".to_string()),
            op: FilterOp::Is,
            value: "null".to_string(),
        }
    }

    /// Render as a single PostgREST query-string key/value pair, e.g.
    /// `metadata->>name=eq.foo`.
    pub fn to_query_pair(&self) -> (String, String) {
        let key = match &self.path {
            Some(path) => format!("{}->>{}", self.column, path),
            None => self.column.clone(),
        };
        (key, format!("{}.{}", self.op.as_str(), self.value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn name_filter_renders_as_postgrest_column_path() {
        let f = Filter::name_eq("my-cluster");
        assert_eq!(
            f.to_query_pair(),
            ("metadata->>name".to_string(), "eq.my-cluster".to_string())
        );
    }

    #[test]
    fn is_not_deleted_uses_is_null() {
        let f = Filter::is_not_deleted();
        assert_eq!(
            f.to_query_pair(),
            (
                "metadata->>deletion_timestamp".to_string(),
                "is.null".to_string()
            )
        );
    }
}
