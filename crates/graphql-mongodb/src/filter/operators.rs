use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Operator fields of a leaf filter and the MongoDB operators they compile to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LeafOperator {
    Eq,
    Gt,
    Gte,
    In,
    Lt,
    Lte,
    Ne,
    Nin,
    Regex,
    Options,
    Not,
}

impl LeafOperator {
    pub fn native(self) -> &'static str {
        match self {
            LeafOperator::Eq => "$eq",
            LeafOperator::Gt => "$gt",
            LeafOperator::Gte => "$gte",
            LeafOperator::In => "$in",
            LeafOperator::Lt => "$lt",
            LeafOperator::Lte => "$lte",
            LeafOperator::Ne => "$ne",
            LeafOperator::Nin => "$nin",
            LeafOperator::Regex => "$regex",
            LeafOperator::Options => "$options",
            LeafOperator::Not => "$not",
        }
    }

    /// Whether the operand is a list of leaf values.
    pub fn takes_list(self) -> bool {
        matches!(self, LeafOperator::In | LeafOperator::Nin)
    }

    /// Operators only offered on string leaves.
    pub fn is_string_only(self) -> bool {
        matches!(self, LeafOperator::Regex | LeafOperator::Options)
    }
}

/// Values of the deprecated `opr` field of leaf filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LegacyOperator {
    Eql,
    Gt,
    Gte,
    In,
    Lt,
    Lte,
    Ne,
    Nin,
}

impl LegacyOperator {
    pub fn operator(self) -> LeafOperator {
        match self {
            LegacyOperator::Eql => LeafOperator::Eq,
            LegacyOperator::Gt => LeafOperator::Gt,
            LegacyOperator::Gte => LeafOperator::Gte,
            LegacyOperator::In => LeafOperator::In,
            LegacyOperator::Lt => LeafOperator::Lt,
            LegacyOperator::Lte => LeafOperator::Lte,
            LegacyOperator::Ne => LeafOperator::Ne,
            LegacyOperator::Nin => LeafOperator::Nin,
        }
    }

    /// Accepts both the enum name (`EQL`) and the native operator it maps to (`$eq`).
    pub fn parse(value: &str) -> Option<LegacyOperator> {
        use strum::IntoEnumIterator;

        value
            .parse()
            .ok()
            .or_else(|| Self::iter().find(|operator| operator.operator().native() == value))
    }
}

/// Values of the `opr` field of nested object filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr, Display, EnumIter, EnumString)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum ExistsOperator {
    Exists,
    NotExists,
}

impl ExistsOperator {
    pub fn native(self) -> &'static str {
        match self {
            ExistsOperator::Exists => "exists",
            ExistsOperator::NotExists => "not_exists",
        }
    }

    /// Accepts both the enum name (`NOT_EXISTS`) and its internal value (`not_exists`).
    pub fn parse(value: &str) -> Option<ExistsOperator> {
        match value {
            "exists" => Some(ExistsOperator::Exists),
            "not_exists" => Some(ExistsOperator::NotExists),
            other => other.parse().ok(),
        }
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("EQL", Some(LeafOperator::Eq))]
    #[case("$eq", Some(LeafOperator::Eq))]
    #[case("NIN", Some(LeafOperator::Nin))]
    #[case("$nin", Some(LeafOperator::Nin))]
    #[case("NE", Some(LeafOperator::Ne))]
    #[case("EQ", None)]
    #[case("$regex", None)]
    fn legacy_operator_parsing(#[case] input: &str, #[case] expected: Option<LeafOperator>) {
        assert_eq!(LegacyOperator::parse(input).map(LegacyOperator::operator), expected);
    }

    #[rstest]
    #[case("exists", Some(ExistsOperator::Exists))]
    #[case("EXISTS", Some(ExistsOperator::Exists))]
    #[case("not_exists", Some(ExistsOperator::NotExists))]
    #[case("NOT_EXISTS", Some(ExistsOperator::NotExists))]
    #[case("maybe", None)]
    fn exists_operator_parsing(#[case] input: &str, #[case] expected: Option<ExistsOperator>) {
        assert_eq!(ExistsOperator::parse(input), expected);
    }

    #[test]
    fn operator_names() {
        assert_eq!(LeafOperator::Gte.to_string(), "GTE");
        assert_eq!("OPTIONS".parse::<LeafOperator>().unwrap(), LeafOperator::Options);
        assert_eq!(ExistsOperator::NotExists.as_ref(), "NOT_EXISTS");
    }
}
