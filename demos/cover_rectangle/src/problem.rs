use quilt::core::{IntCst, LongCst, INT_CST_MAX};
use std::fmt::{Display, Formatter};
use std::num::ParseIntError;
use std::str::FromStr;

/// The rectangle to cover, with its bottom-left corner at the origin.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub width: IntCst,
    pub height: IntCst,
}

impl Rectangle {
    pub const fn new(width: IntCst, height: IntCst) -> Self {
        Rectangle { width, height }
    }

    pub fn area(&self) -> LongCst {
        self.width as LongCst * self.height as LongCst
    }

    /// Checks that the rectangle can be modeled: positive dimensions and an area that is a valid integer constant.
    pub fn validate(&self) -> Result<(), RectangleError> {
        if self.width <= 0 || self.height <= 0 {
            return Err(RectangleError::NonPositive(*self));
        }
        if self.area() > INT_CST_MAX as LongCst {
            return Err(RectangleError::TooLarge(*self));
        }
        Ok(())
    }
}

impl Default for Rectangle {
    fn default() -> Self {
        Rectangle::new(72, 37)
    }
}

impl Display for Rectangle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RectangleError {
    #[error("expected a rectangle as WIDTHxHEIGHT, got '{0}'")]
    MissingSeparator(String),
    #[error("invalid dimension '{value}': {source}")]
    InvalidDimension { value: String, source: ParseIntError },
    #[error("dimensions must be positive, got {0}")]
    NonPositive(Rectangle),
    #[error("the area of the {0} rectangle exceeds {max}", max = INT_CST_MAX)]
    TooLarge(Rectangle),
}

impl FromStr for Rectangle {
    type Err = RectangleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (width, height) = s
            .trim()
            .split_once(|c: char| c == 'x' || c == 'X')
            .ok_or_else(|| RectangleError::MissingSeparator(s.to_string()))?;
        let parse = |value: &str| {
            value
                .trim()
                .parse::<IntCst>()
                .map_err(|source| RectangleError::InvalidDimension {
                    value: value.to_string(),
                    source,
                })
        };
        let rect = Rectangle::new(parse(width)?, parse(height)?);
        rect.validate()?;
        Ok(rect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_rectangles() {
        assert_eq!("72x37".parse(), Ok(Rectangle::new(72, 37)));
        assert_eq!(" 3X2 ".parse(), Ok(Rectangle::new(3, 2)));
        assert_eq!(Rectangle::default().to_string(), "72x37");
        assert_eq!(Rectangle::default().area(), 2664);

        assert!(matches!(
            "72".parse::<Rectangle>(),
            Err(RectangleError::MissingSeparator(_))
        ));
        assert!(matches!(
            "7ax3".parse::<Rectangle>(),
            Err(RectangleError::InvalidDimension { .. })
        ));
        assert_eq!(
            "0x3".parse::<Rectangle>(),
            Err(RectangleError::NonPositive(Rectangle::new(0, 3)))
        );
    }

    #[test]
    fn area_must_fit_integer_constants() {
        assert_eq!(Rectangle::new(72, 37).validate(), Ok(()));
        assert_eq!(Rectangle::new(1, INT_CST_MAX).validate(), Ok(()));
        assert_eq!(
            Rectangle::new(50_000, 50_000).validate(),
            Err(RectangleError::TooLarge(Rectangle::new(50_000, 50_000)))
        );
        assert_eq!(
            "50000x50000".parse::<Rectangle>(),
            Err(RectangleError::TooLarge(Rectangle::new(50_000, 50_000)))
        );
        assert_eq!(
            Rectangle::new(-2, 3).validate(),
            Err(RectangleError::NonPositive(Rectangle::new(-2, 3)))
        );
    }
}
