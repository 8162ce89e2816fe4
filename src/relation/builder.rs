use super::{PairFn, PairSource, RelationKind, Setter};
use crate::arity::{Arity, Side};
use crate::entity::{EntityKind, KeyFn};
use crate::error::ConfigError;
use crate::key::Key;

use std::sync::Arc;

/// Fluent declaration of a [`RelationKind`].
///
/// Declare the arities (and, unless a custom pair extractor is given, the two key columns), then
/// at least one setter, then call [`RelationBuilder::build`]. The first mistake made along the way
/// is reported by `build`.
pub struct RelationBuilder<Row, L, R, K> {
    left: EntityKind<Row, L, K>,
    right: EntityKind<Row, R, K>,
    arities: Option<(Arity, Arity)>,
    keys: Option<(KeyFn<Row, K>, KeyFn<Row, K>)>,
    extractor: Option<PairFn<Row, K>>,
    left_setter: Option<Setter<L, R>>,
    right_setter: Option<Setter<R, L>>,
    error: Option<ConfigError>,
}

impl<Row, L, R, K: Key> RelationBuilder<Row, L, R, K> {
    pub fn new(left: &EntityKind<Row, L, K>, right: &EntityKind<Row, R, K>) -> Self {
        RelationBuilder {
            left: left.clone(),
            right: right.clone(),
            arities: None,
            keys: None,
            extractor: None,
            left_setter: None,
            right_setter: None,
            error: None,
        }
    }

    /// Declare the arity of each side: `left` is the number of left objects each right object is
    /// linked to, `right` the number of right objects each left object is linked to.
    pub fn arities(mut self, left: Arity, right: Arity) -> Self {
        if self.arities.is_some() {
            let (left, right) = self.names();
            self.fail(ConfigError::ArityAlreadySet { left, right });
        } else {
            self.arities = Some((left, right));
        }
        self
    }

    /// Declare the key columns read by the default pair extractor. A row evidences the pair
    /// `(left_key(row), right_key(row))` when both keys are present.
    pub fn keys(
        mut self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.keys = Some((Box::new(left_key), Box::new(right_key)));
        self
    }

    /// Replace the default pair extractor.
    pub fn pair_extractor(
        mut self,
        extract: impl Fn(&Row) -> Vec<(K, K)> + Send + Sync + 'static,
    ) -> Self {
        self.extractor = Some(Box::new(extract));
        self
    }

    /// Each left object has exactly one right object and vice versa.
    pub fn one_to_one(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::One, Arity::One).keys(left_key, right_key)
    }

    /// Each left object has zero or one right object; each right object has exactly one left
    /// object.
    pub fn one_to_zero_or_one(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::One, Arity::ZeroOrOne).keys(left_key, right_key)
    }

    /// Each left object has zero or one right object and vice versa.
    pub fn optional_one_to_one(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::ZeroOrOne, Arity::ZeroOrOne).keys(left_key, right_key)
    }

    /// Each left object has exactly one right object; each right object has zero or one left
    /// object.
    pub fn zero_or_one_to_one(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::ZeroOrOne, Arity::One).keys(left_key, right_key)
    }

    /// Each left object has any number of right objects; each right object has exactly one left
    /// object.
    pub fn one_to_many(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::One, Arity::Many).keys(left_key, right_key)
    }

    /// Each left object has any number of right objects; each right object has zero or one left
    /// object.
    pub fn zero_or_one_to_many(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::ZeroOrOne, Arity::Many).keys(left_key, right_key)
    }

    pub fn many_to_many(
        self,
        left_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
        right_key: impl Fn(&Row) -> Option<K> + Send + Sync + 'static,
    ) -> Self {
        self.arities(Arity::Many, Arity::Many).keys(left_key, right_key)
    }

    /// Link each left object to its single right object. Requires a `ONE` right arity.
    pub fn set_one_left(self, setter: impl Fn(&Arc<L>, Arc<R>) + Send + Sync + 'static) -> Self {
        self.with_left_setter(Setter::One(Box::new(setter)))
    }

    /// Link each left object to its optional right object. Requires a `ZERO_OR_ONE` right arity.
    pub fn set_zero_or_one_left(
        self,
        setter: impl Fn(&Arc<L>, Option<Arc<R>>) + Send + Sync + 'static,
    ) -> Self {
        self.with_left_setter(Setter::ZeroOrOne(Box::new(setter)))
    }

    /// Link each left object to its right objects. Requires a `MANY` right arity.
    pub fn set_many_left(
        self,
        setter: impl Fn(&Arc<L>, Vec<Arc<R>>) + Send + Sync + 'static,
    ) -> Self {
        self.with_left_setter(Setter::Many(Box::new(setter)))
    }

    /// Link each right object to its single left object. Requires a `ONE` left arity.
    pub fn set_one_right(self, setter: impl Fn(&Arc<R>, Arc<L>) + Send + Sync + 'static) -> Self {
        self.with_right_setter(Setter::One(Box::new(setter)))
    }

    /// Link each right object to its optional left object. Requires a `ZERO_OR_ONE` left arity.
    pub fn set_zero_or_one_right(
        self,
        setter: impl Fn(&Arc<R>, Option<Arc<L>>) + Send + Sync + 'static,
    ) -> Self {
        self.with_right_setter(Setter::ZeroOrOne(Box::new(setter)))
    }

    /// Link each right object to its left objects. Requires a `MANY` left arity.
    pub fn set_many_right(
        self,
        setter: impl Fn(&Arc<R>, Vec<Arc<L>>) + Send + Sync + 'static,
    ) -> Self {
        self.with_right_setter(Setter::Many(Box::new(setter)))
    }

    pub fn build(mut self) -> Result<RelationKind<Row, L, R, K>, ConfigError> {
        if let Some(error) = self.error.take() {
            return Err(error);
        }

        let (left, right) = self.names();
        let Some((left_arity, right_arity)) = self.arities else {
            return Err(ConfigError::ArityNotSet { left, right });
        };
        if self.left_setter.is_none() && self.right_setter.is_none() {
            return Err(ConfigError::NoSetter { left, right });
        }
        let pairs = match (self.extractor, self.keys) {
            (Some(extract), _) => PairSource::Custom(extract),
            (None, Some((left, right))) => PairSource::Keys { left, right },
            (None, None) => return Err(ConfigError::NoPairSource { left, right }),
        };

        Ok(RelationKind::from_parts(
            self.left,
            self.right,
            left_arity,
            right_arity,
            self.left_setter,
            self.right_setter,
            pairs,
        ))
    }

    fn with_left_setter(mut self, setter: Setter<L, R>) -> Self {
        match self.check_setter(Side::Left, setter.arity()) {
            Ok(()) => self.left_setter = Some(setter),
            Err(error) => self.fail(error),
        }
        self
    }

    fn with_right_setter(mut self, setter: Setter<R, L>) -> Self {
        match self.check_setter(Side::Right, setter.arity()) {
            Ok(()) => self.right_setter = Some(setter),
            Err(error) => self.fail(error),
        }
        self
    }

    // A left setter receives right objects, so it must match the right arity.
    fn check_setter(&self, side: Side, setter: Arity) -> Result<(), ConfigError> {
        let (left, right) = self.names();
        let Some((left_arity, right_arity)) = self.arities else {
            return Err(ConfigError::ArityNotSet { left, right });
        };
        let declared = match side {
            Side::Left => right_arity,
            Side::Right => left_arity,
        };
        if declared == setter {
            Ok(())
        } else {
            Err(ConfigError::SetterArityMismatch {
                left,
                right,
                side,
                declared,
                setter,
            })
        }
    }

    fn names(&self) -> (String, String) {
        (self.left.name().to_string(), self.right.name().to_string())
    }

    fn fail(&mut self, error: ConfigError) {
        self.error.get_or_insert(error);
    }
}
