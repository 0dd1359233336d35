use super::{ConnectionArguments, Cursor, Traversal};
use crate::error::{
    ArgumentErrorKind, ArgumentErrors, ArgumentField, PaginationArgumentError,
};
use serde_derive::{Deserialize, Serialize};

/// What to do with a `first`/`last` above the maximum page size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitPolicy {
    /// Fail with `LimitExceeded`.
    #[default]
    Reject,
    /// Silently lower the count to the maximum page size.
    Clamp,
}

impl TryFrom<String> for LimitPolicy {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "reject" => Ok(Self::Reject),
            "clamp" => Ok(Self::Clamp),
            other => Err(format!("{} is not a supported limit policy.", other)),
        }
    }
}

/// Arguments that passed every rule, resolved to one traversal direction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedArguments {
    pub traversal: Traversal,
    /// Page size after clamping.
    pub limit: u64,
    /// `after` for forward traversal, `before` for backward.
    pub cursor: Option<Cursor>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArgumentValidator {
    max_limit: u64,
    limit_policy: LimitPolicy,
}

impl ArgumentValidator {
    pub fn new(max_limit: u64, limit_policy: LimitPolicy) -> Self {
        Self {
            max_limit,
            limit_policy,
        }
    }

    pub fn max_limit(&self) -> u64 {
        self.max_limit
    }

    pub fn limit_policy(&self) -> LimitPolicy {
        self.limit_policy
    }

    /// Stops at the first rule violation.
    pub fn validate(
        &self,
        arguments: &ConnectionArguments,
    ) -> Result<ValidatedArguments, PaginationArgumentError> {
        match self.violations(arguments).into_iter().next() {
            Some(error) => Err(error),
            None => Ok(self.resolve(arguments)),
        }
    }

    /// Reports every rule violation at once.
    pub fn validate_all(
        &self,
        arguments: &ConnectionArguments,
    ) -> Result<ValidatedArguments, ArgumentErrors> {
        let violations = self.violations(arguments);
        if violations.is_empty() {
            Ok(self.resolve(arguments))
        } else {
            Err(ArgumentErrors(violations))
        }
    }

    fn violations(&self, arguments: &ConnectionArguments) -> Vec<PaginationArgumentError> {
        let mut violations = Vec::new();
        let mut violation = |kind, field| violations.push(PaginationArgumentError::new(kind, field));

        match (arguments.first, arguments.last) {
            (None, None) => violation(ArgumentErrorKind::MissingBound, ArgumentField::First),
            (Some(_), Some(_)) => {
                violation(ArgumentErrorKind::ConflictingBounds, ArgumentField::Last)
            }
            _ => {}
        }

        if arguments.first.is_some() && arguments.before.is_some() {
            violation(ArgumentErrorKind::ConflictingBounds, ArgumentField::Before);
        }
        if arguments.last.is_some() && arguments.after.is_some() {
            violation(ArgumentErrorKind::ConflictingBounds, ArgumentField::After);
        }

        for (count, field) in [
            (arguments.first, ArgumentField::First),
            (arguments.last, ArgumentField::Last),
        ] {
            let Some(count) = count else { continue };
            if count < 0 {
                violation(ArgumentErrorKind::NegativeLimit, field);
            } else if count as u64 > self.max_limit && self.limit_policy == LimitPolicy::Reject {
                violation(ArgumentErrorKind::LimitExceeded, field);
            }
        }

        violations
    }

    // Only called once `violations` came back empty, so exactly one count is
    // present and it is non-negative.
    fn resolve(&self, arguments: &ConnectionArguments) -> ValidatedArguments {
        let (traversal, count, cursor) = match arguments.first {
            Some(first) => (Traversal::Forward, first, arguments.after.clone()),
            None => (
                Traversal::Backward,
                arguments.last.unwrap_or_default(),
                arguments.before.clone(),
            ),
        };

        ValidatedArguments {
            traversal,
            limit: (count.max(0) as u64).min(self.max_limit),
            cursor,
        }
    }
}
