use fixed::types::I26F6;

// Sub-pixel coordinate stored as 26.6 fixed point (1/64 px).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Fx(I26F6);

impl Fx {
    pub const ZERO: Fx = Fx(I26F6::from_bits(0));

    pub fn from_f32(value: f32) -> Fx {
        if !value.is_finite() {
            return Fx::ZERO;
        }
        Fx(I26F6::saturating_from_num(value))
    }

    pub fn from_bits(bits: i32) -> Fx {
        Fx(I26F6::from_bits(bits))
    }

    pub fn to_bits(self) -> i32 {
        self.0.to_bits()
    }

    pub fn to_f32(self) -> f32 {
        self.0.to_num()
    }

    pub fn abs(self) -> Fx {
        Fx(self.0.saturating_abs())
    }

    pub fn min(self, other: Fx) -> Fx {
        if self <= other { self } else { other }
    }

    pub fn max(self, other: Fx) -> Fx {
        if self >= other { self } else { other }
    }
}

impl std::ops::Add for Fx {
    type Output = Fx;
    fn add(self, rhs: Fx) -> Fx {
        Fx(self.0.saturating_add(rhs.0))
    }
}

impl std::ops::Sub for Fx {
    type Output = Fx;
    fn sub(self, rhs: Fx) -> Fx {
        Fx(self.0.saturating_sub(rhs.0))
    }
}

impl std::ops::Neg for Fx {
    type Output = Fx;
    fn neg(self) -> Fx {
        Fx(self.0.saturating_neg())
    }
}

impl std::fmt::Display for Fx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.3}", self.to_f32())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Point {
    pub x: Fx,
    pub y: Fx,
}

impl Point {
    pub const ORIGIN: Point = Point {
        x: Fx::ZERO,
        y: Fx::ZERO,
    };

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: Fx::from_f32(x),
            y: Fx::from_f32(y),
        }
    }

    pub fn to_f32(self) -> (f32, f32) {
        (self.x.to_f32(), self.y.to_f32())
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{},{}", self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}
