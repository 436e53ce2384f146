use crate::path_data::NumberScanner;
use crate::types::Bounds;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Px,
    Cm,
    Mm,
    Pt,
    In,
    // Quarter millimetres.
    Q,
    Pc,
    Percent,
}

// Axis a percentage is measured against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    // Normalized viewport diagonal, `sqrt(w² + h²) / sqrt(2)`.
    Diagonal,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Length {
    pub value: f32,
    pub unit: Unit,
}

impl Length {
    pub fn px(value: f32) -> Self {
        Self {
            value,
            unit: Unit::Px,
        }
    }

    pub fn parse(input: &str) -> Option<Length> {
        let s = input.trim();
        let mut scanner = NumberScanner::new(s);
        let value = scanner.next_number()?;
        let suffix = s[scanner.offset()..].trim();
        let unit = match suffix {
            "" | "px" => Unit::Px,
            "cm" => Unit::Cm,
            "mm" => Unit::Mm,
            "pt" => Unit::Pt,
            "in" => Unit::In,
            "Q" => Unit::Q,
            "pc" => Unit::Pc,
            "%" => Unit::Percent,
            _ => return None,
        };
        Some(Length { value, unit })
    }

    pub fn is_percent(&self) -> bool {
        self.unit == Unit::Percent
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitResolver {
    pub viewport: Bounds,
    pub dpi: f32,
}

impl UnitResolver {
    pub fn new(viewport: Bounds, dpi: f32) -> Self {
        Self { viewport, dpi }
    }

    pub fn percent_base(&self, axis: Axis) -> f32 {
        let w = self.viewport.width;
        let h = self.viewport.height;
        match axis {
            Axis::X => w,
            Axis::Y => h,
            Axis::Diagonal => (w * w + h * h).sqrt() / std::f32::consts::SQRT_2,
        }
    }

    pub fn resolve(&self, length: Length, axis: Axis) -> f32 {
        let v = length.value;
        match length.unit {
            Unit::Px => v,
            Unit::In => v * self.dpi,
            Unit::Cm => v * self.dpi / 2.54,
            Unit::Mm => v * self.dpi / 25.4,
            Unit::Q => v * self.dpi / (25.4 * 4.0),
            Unit::Pt => v * self.dpi / 72.0,
            Unit::Pc => v * self.dpi / 6.0,
            Unit::Percent => v / 100.0 * self.percent_base(axis),
        }
    }

    pub fn parse(&self, input: &str, axis: Axis) -> Option<f32> {
        Length::parse(input).map(|len| self.resolve(len, axis))
    }
}
