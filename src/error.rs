use std::fmt;

use serde_json::Value;

/// Errors that can occur outside of input validation proper.
///
/// Validation failures are *data* ([`ValidationErrors`]), not `Error`s. This
/// type covers the surrounding plumbing: broken schema declarations, request
/// bodies that are not JSON, and validated params that do not fit a caller's
/// target type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A schema declaration is unusable.
    #[error("invalid schema: {0}")]
    Schema(#[from] SchemaError),
    /// The request body could not be parsed as JSON.
    #[error("malformed JSON body: {0}")]
    MalformedBody(#[source] serde_json::Error),
    /// A JSON document was expected to be an object.
    #[error("expected a JSON object, found {found}")]
    NotAnObject {
        /// JSON type actually found
        found: &'static str,
    },
    /// Validated params could not be deserialized into the requested type.
    #[error("validated params do not fit the target type: {0}")]
    Deserialize(#[source] serde_json::Error),
}

/// A defect in a schema declaration, detected at registration time.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The schema document is not valid JSON or does not describe fields.
    #[error("unreadable schema document: {0}")]
    Document(#[from] serde_json::Error),
    /// Two fields share a name or lookup alias.
    #[error("duplicate field '{name}'")]
    DuplicateField {
        /// The repeated name
        name: String,
    },
    /// An enumeration declares no members.
    #[error("enum field '{field}' declares no values")]
    EmptyEnum {
        /// Qualified field name
        field: String,
    },
    /// A numeric bound is NaN or infinite.
    #[error("field '{field}' has a non-finite bound")]
    NonFiniteBound {
        /// Qualified field name
        field: String,
    },
    /// The lower bound excludes every value the upper bound admits.
    #[error("field '{field}' has a lower bound above its upper bound")]
    InvertedBounds {
        /// Qualified field name
        field: String,
    },
    /// The minimum length exceeds the maximum length.
    #[error("field '{field}' has min_length above max_length")]
    InvertedLength {
        /// Qualified field name
        field: String,
    },
    /// A constraint was attached to a kind that cannot carry it.
    #[error("field '{field}' of kind {kind} cannot carry a {constraint} constraint")]
    UnsupportedConstraint {
        /// Qualified field name
        field: String,
        /// Constraint name
        constraint: &'static str,
        /// Declared kind name
        kind: &'static str,
    },
    /// The declared default does not satisfy its own field.
    #[error("default of field '{field}' is invalid: {errors}")]
    InvalidDefault {
        /// Qualified field name
        field: String,
        /// Violations raised by the default value
        errors: ValidationErrors,
    },
}

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    /// An object key
    Key(String),
    /// A collection index
    Index(usize),
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(key) => write!(f, "{}", key),
            PathSegment::Index(idx) => write!(f, "[{}]", idx),
        }
    }
}

/// Location of a violation inside the validated input.
///
/// Top-level fields have a single segment. Violations inside nested objects
/// and collections carry the full path, rendered as `image.url` or `tags[2]`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldPath {
    segments: Vec<PathSegment>,
}

impl FieldPath {
    /// The empty path (the input as a whole).
    pub fn root() -> Self {
        Self::default()
    }

    /// A single-segment path naming a top-level field.
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            segments: vec![PathSegment::Key(name.into())],
        }
    }

    /// Returns this path extended by an object key.
    pub fn key(&self, name: impl Into<String>) -> Self {
        let mut child = self.clone();
        child.segments.push(PathSegment::Key(name.into()));
        child
    }

    /// Returns this path extended by a collection index.
    pub fn index(&self, idx: usize) -> Self {
        let mut child = self.clone();
        child.segments.push(PathSegment::Index(idx));
        child
    }

    /// The path segments, outermost first.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// The outermost key, i.e. the top-level field this path belongs to.
    pub fn first_key(&self) -> Option<&str> {
        match self.segments.first() {
            Some(PathSegment::Key(key)) => Some(key),
            _ => None,
        }
    }

    /// Whether the path points below a top-level field.
    pub fn is_nested(&self) -> bool {
        self.segments.len() > 1
    }

    pub(crate) fn prefixed(mut self, segment: PathSegment) -> Self {
        self.segments.insert(0, segment);
        self
    }

    pub(crate) fn with_first_key(mut self, key: &str) -> Self {
        if let Some(PathSegment::Key(first)) = self.segments.first_mut() {
            *first = key.to_string();
        }
        self
    }

    fn without_first(&self) -> Self {
        Self {
            segments: self.segments.iter().skip(1).cloned().collect(),
        }
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i > 0 => write!(f, ".{}", key)?,
                other => write!(f, "{}", other)?,
            }
        }
        Ok(())
    }
}

/// Which declared constraint a value failed.
#[derive(Debug, Clone, PartialEq)]
pub enum ConstraintKind {
    /// Numeric lower bound (`ge`, or `gt` when exclusive)
    Minimum {
        /// The bound
        limit: f64,
        /// Whether the bound itself is excluded
        exclusive: bool,
    },
    /// Numeric upper bound (`le`, or `lt` when exclusive)
    Maximum {
        /// The bound
        limit: f64,
        /// Whether the bound itself is excluded
        exclusive: bool,
    },
    /// Minimum string length or collection size
    MinLength {
        /// Smallest accepted length
        min: usize,
    },
    /// Maximum string length or collection size
    MaxLength {
        /// Largest accepted length
        max: usize,
    },
    /// Value is not one of the declared enumeration members
    EnumMembership {
        /// The declared members
        allowed: Vec<String>,
    },
}

impl ConstraintKind {
    /// Stable machine-readable identifier.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Minimum { exclusive: false, .. } => "value_error.number.not_ge",
            Self::Minimum { exclusive: true, .. } => "value_error.number.not_gt",
            Self::Maximum { exclusive: false, .. } => "value_error.number.not_le",
            Self::Maximum { exclusive: true, .. } => "value_error.number.not_lt",
            Self::MinLength { .. } => "value_error.length.min",
            Self::MaxLength { .. } => "value_error.length.max",
            Self::EnumMembership { .. } => "type_error.enum",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum { limit, exclusive } => {
                let op = if *exclusive { "greater than" } else { "greater than or equal to" };
                write!(f, "ensure this value is {} {}", op, DisplayLimit(*limit))
            }
            Self::Maximum { limit, exclusive } => {
                let op = if *exclusive { "less than" } else { "less than or equal to" };
                write!(f, "ensure this value is {} {}", op, DisplayLimit(*limit))
            }
            Self::MinLength { min } => write!(f, "ensure this value has a length of at least {}", min),
            Self::MaxLength { max } => write!(f, "ensure this value has a length of at most {}", max),
            Self::EnumMembership { allowed } => {
                write!(f, "value is not a valid enumeration member; permitted: ")?;
                for (i, member) in allowed.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "'{}'", member)?;
                }
                Ok(())
            }
        }
    }
}

// Renders integral bounds without a trailing `.0`.
struct DisplayLimit(f64);

impl fmt::Display for DisplayLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 && self.0.abs() < 1e15 {
            write!(f, "{}", self.0 as i64)
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// The kind of a single violation.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationKind {
    /// A required field without default was absent
    MissingRequiredField,
    /// The raw value could not be coerced to the declared kind
    TypeMismatch {
        /// Name of the expected kind (or string format)
        expected: &'static str,
    },
    /// The coerced value failed a declared constraint
    Constraint(ConstraintKind),
}

impl ViolationKind {
    /// Stable machine-readable identifier.
    pub fn code(&self) -> String {
        match self {
            Self::MissingRequiredField => "value_error.missing".to_string(),
            Self::TypeMismatch { expected } => format!("type_error.{}", expected),
            Self::Constraint(kind) => kind.code().to_string(),
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingRequiredField => write!(f, "field required"),
            Self::TypeMismatch { expected } => write!(f, "value is not a valid {}", expected),
            Self::Constraint(kind) => write!(f, "{}", kind),
        }
    }
}

/// A single recorded failure of one constraint on one field.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// Where the offending value sits in the input
    pub path: FieldPath,
    /// What went wrong
    pub kind: ViolationKind,
    /// The offending raw value, when one was supplied
    pub input: Option<Value>,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(path: FieldPath, kind: ViolationKind, input: Option<Value>) -> Self {
        Self { path, kind, input }
    }

    pub(crate) fn missing(path: FieldPath) -> Self {
        Self::new(path, ViolationKind::MissingRequiredField, None)
    }

    pub(crate) fn mismatch(path: FieldPath, expected: &'static str, input: &Value) -> Self {
        Self::new(
            path,
            ViolationKind::TypeMismatch { expected },
            Some(input.clone()),
        )
    }

    pub(crate) fn constraint(path: FieldPath, kind: ConstraintKind, input: &Value) -> Self {
        Self::new(path, ViolationKind::Constraint(kind), Some(input.clone()))
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

impl std::error::Error for Violation {}

/// The complete, ordered list of violations for one input.
///
/// Order follows schema declaration order; nested violations appear where
/// their top-level field is declared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationErrors {
    violations: Vec<Violation>,
}

impl ValidationErrors {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a violation.
    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    /// Appends every violation from `other`.
    pub fn append(&mut self, other: ValidationErrors) {
        self.violations.extend(other.violations);
    }

    /// Whether no violation was recorded.
    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    /// Number of recorded violations.
    pub fn len(&self) -> usize {
        self.violations.len()
    }

    /// Iterates the violations in reporting order.
    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.violations.iter()
    }

    /// Borrows the violations as a slice.
    pub fn as_slice(&self) -> &[Violation] {
        &self.violations
    }

    /// Violations whose top-level field is `name`, including nested ones.
    pub fn for_field<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Violation> + 'a {
        self.violations
            .iter()
            .filter(move |v| v.path.first_key() == Some(name))
    }

    /// The violations nested below field `name`, re-rooted at that field.
    ///
    /// `image.url` becomes `url` when viewed under `image`. Violations on
    /// `name` itself are not included.
    pub fn nested_under(&self, name: &str) -> ValidationErrors {
        ValidationErrors {
            violations: self
                .for_field(name)
                .filter(|v| v.path.is_nested())
                .map(|v| Violation {
                    path: v.path.without_first(),
                    kind: v.kind.clone(),
                    input: v.input.clone(),
                })
                .collect(),
        }
    }

    /// Prepends `segment` to every violation path.
    pub(crate) fn prefixed(self, segment: PathSegment) -> Self {
        Self {
            violations: self
                .violations
                .into_iter()
                .map(|mut v| {
                    v.path = v.path.prefixed(segment.clone());
                    v
                })
                .collect(),
        }
    }

    /// Consumes the list, returning the violations.
    pub fn into_vec(self) -> Vec<Violation> {
        self.violations
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n = self.violations.len();
        write!(f, "{} validation error{}", n, if n == 1 { "" } else { "s" })?;
        for v in &self.violations {
            write!(f, "; {}", v)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = Violation;
    type IntoIter = std::vec::IntoIter<Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.into_iter()
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.violations.iter()
    }
}

impl FromIterator<Violation> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = Violation>>(iter: I) -> Self {
        Self {
            violations: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_display_mixes_keys_and_indices() {
        let path = FieldPath::field("product").key("tags").index(2);
        assert_eq!(path.to_string(), "product.tags[2]");
        assert_eq!(path.first_key(), Some("product"));
        assert!(path.is_nested());
    }

    #[test]
    fn prefixed_path_gets_new_root() {
        let path = FieldPath::field("q").prefixed(PathSegment::Key("query".into()));
        assert_eq!(path.to_string(), "query.q");
    }

    #[test]
    fn constraint_messages_render_integral_limits() {
        let kind = ConstraintKind::Minimum {
            limit: 10.0,
            exclusive: false,
        };
        assert_eq!(
            kind.to_string(),
            "ensure this value is greater than or equal to 10"
        );

        let kind = ConstraintKind::Maximum {
            limit: 0.5,
            exclusive: true,
        };
        assert_eq!(kind.to_string(), "ensure this value is less than 0.5");
    }

    #[test]
    fn enum_message_lists_members() {
        let kind = ConstraintKind::EnumMembership {
            allowed: vec!["AlexNet".into(), "Light GBM".into()],
        };
        assert!(kind.to_string().ends_with("'AlexNet', 'Light GBM'"));
    }

    #[test]
    fn violation_codes() {
        assert_eq!(ViolationKind::MissingRequiredField.code(), "value_error.missing");
        assert_eq!(
            ViolationKind::TypeMismatch { expected: "integer" }.code(),
            "type_error.integer"
        );
        assert_eq!(
            ViolationKind::Constraint(ConstraintKind::MaxLength { max: 3 }).code(),
            "value_error.length.max"
        );
    }

    #[test]
    fn nested_under_reroots_child_violations() {
        let errors: ValidationErrors = vec![
            Violation::missing(FieldPath::field("name")),
            Violation::mismatch(FieldPath::field("image").key("url"), "url", &json!("nope")),
            Violation::mismatch(FieldPath::field("image"), "object", &json!(3)),
        ]
        .into_iter()
        .collect();

        let nested = errors.nested_under("image");
        assert_eq!(nested.len(), 1);
        assert_eq!(nested.as_slice()[0].path.to_string(), "url");
        assert_eq!(errors.for_field("image").count(), 2);
    }

    #[test]
    fn errors_display_counts() {
        let mut errors = ValidationErrors::new();
        errors.push(Violation::missing(FieldPath::field("a")));
        assert_eq!(errors.to_string(), "1 validation error; a: field required");
    }
}
