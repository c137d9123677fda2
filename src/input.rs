//! Coercion of form input into engine types.
//!
//! The engine assumes well-formed reals. Anything typed by a user passes
//! through here first: fields are trimmed and parsed, values outside the
//! documented ranges are clamped, and values that cannot be repaired are
//! rejected.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::AllocError;
use crate::types::Category;

/// Raw category fields as they arrive from a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CategoryInput {
    pub name: String,
    pub price: String,
    pub utility_factor: String,
    pub basic_need_amount: String,
    pub diminishing_factor: String,
    pub necessity_level: String,
}

fn parse_field(field: &str, value: &str) -> Result<f64, AllocError> {
    let invalid = || AllocError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    };
    let parsed: f64 = value.trim().parse().map_err(|_| invalid())?;
    if !parsed.is_finite() {
        return Err(invalid());
    }
    Ok(parsed)
}

impl TryFrom<&CategoryInput> for Category {
    type Error = AllocError;

    /// Parses every field. Necessity is clamped to [1, 10] and the
    /// diminishing factor to [0, 1]; negative prices and basic needs are
    /// rejected.
    ///
    /// # Examples
    ///
    /// ```
    /// use u_budget::Category;
    /// use u_budget::input::CategoryInput;
    ///
    /// let input = CategoryInput {
    ///     name: " Food ".into(),
    ///     price: "2.50".into(),
    ///     utility_factor: "3".into(),
    ///     basic_need_amount: "10".into(),
    ///     diminishing_factor: "1.4".into(),
    ///     necessity_level: "12".into(),
    /// };
    /// let food = Category::try_from(&input).unwrap();
    /// assert_eq!(food.name, "Food");
    /// assert_eq!(food.diminishing_factor, 1.0);
    /// assert_eq!(food.necessity_level, 10.0);
    /// ```
    fn try_from(input: &CategoryInput) -> Result<Self, Self::Error> {
        let name = input.name.trim();
        if name.is_empty() {
            return Err(AllocError::InvalidField {
                field: "name".into(),
                value: input.name.clone(),
            });
        }

        let price = parse_field("price", &input.price)?;
        if price < 0.0 {
            return Err(AllocError::InvalidField {
                field: "price".into(),
                value: input.price.clone(),
            });
        }
        let basic = parse_field("basic_need_amount", &input.basic_need_amount)?;
        if basic < 0.0 {
            return Err(AllocError::InvalidField {
                field: "basic_need_amount".into(),
                value: input.basic_need_amount.clone(),
            });
        }

        Ok(Category::new(name, price)
            .with_utility_factor(parse_field("utility_factor", &input.utility_factor)?)
            .with_basic_need(basic)
            .with_diminishing_factor(parse_field("diminishing_factor", &input.diminishing_factor)?.clamp(0.0, 1.0))
            .with_necessity(parse_field("necessity_level", &input.necessity_level)?.clamp(1.0, 10.0)))
    }
}

impl From<&Category> for CategoryInput {
    fn from(category: &Category) -> Self {
        Self {
            name: category.name.clone(),
            price: category.price.to_string(),
            utility_factor: category.utility_factor.to_string(),
            basic_need_amount: category.basic_need_amount.to_string(),
            diminishing_factor: category.diminishing_factor.to_string(),
            necessity_level: category.necessity_level.to_string(),
        }
    }
}

/// Parses a budget field. The budget must be a finite, non-negative number.
pub fn parse_budget(value: &str) -> Result<f64, AllocError> {
    let budget = parse_field("budget", value)?;
    if budget < 0.0 {
        return Err(AllocError::InvalidField {
            field: "budget".into(),
            value: value.to_string(),
        });
    }
    Ok(budget)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> CategoryInput {
        CategoryInput {
            name: "Rent".into(),
            price: "800".into(),
            utility_factor: "2".into(),
            basic_need_amount: "1".into(),
            diminishing_factor: "0.5".into(),
            necessity_level: "10".into(),
        }
    }

    #[test]
    fn test_parse_valid() {
        let c = Category::try_from(&input()).unwrap();
        assert_eq!(c.price, 800.0);
        assert_eq!(c.utility_factor, 2.0);
        assert_eq!(c.basic_need_amount, 1.0);
        assert!(c.validate().is_ok());
    }

    #[test]
    fn test_clamps_ranges() {
        let mut raw = input();
        raw.necessity_level = "0".into();
        raw.diminishing_factor = "-3".into();
        let c = Category::try_from(&raw).unwrap();
        assert_eq!(c.necessity_level, 1.0);
        assert_eq!(c.diminishing_factor, 0.0);
    }

    #[test]
    fn test_rejects_bad_fields() {
        let mut raw = input();
        raw.price = "abc".into();
        assert_eq!(
            Category::try_from(&raw),
            Err(AllocError::InvalidField {
                field: "price".into(),
                value: "abc".into()
            })
        );

        let mut raw = input();
        raw.price = "-1".into();
        assert!(Category::try_from(&raw).is_err());

        let mut raw = input();
        raw.utility_factor = "NaN".into();
        assert!(Category::try_from(&raw).is_err());

        let mut raw = input();
        raw.name = "   ".into();
        assert!(Category::try_from(&raw).is_err());
    }

    #[test]
    fn test_category_round_trip_through_form() {
        let original = Category::new("Tea", 0.25)
            .with_basic_need(3.0)
            .with_necessity(2.0);
        let back = Category::try_from(&CategoryInput::from(&original)).unwrap();
        assert_eq!(back, original);
    }

    #[test]
    fn test_parse_budget() {
        assert_eq!(parse_budget(" 166 "), Ok(166.0));
        assert!(parse_budget("-5").is_err());
        assert!(parse_budget("inf").is_err());
        assert!(parse_budget("").is_err());
    }
}
