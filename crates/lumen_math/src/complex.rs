//! Minimal complex numbers for conductor Fresnel terms.

use std::ops::{Add, Div, Mul, Neg, Sub};

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Complex {
    pub re: f32,
    pub im: f32,
}

impl Complex {
    pub const fn new(re: f32, im: f32) -> Self {
        Self { re, im }
    }

    /// Squared magnitude `re² + im²`.
    #[inline]
    pub fn norm(self) -> f32 {
        self.re * self.re + self.im * self.im
    }

    #[inline]
    pub fn abs(self) -> f32 {
        self.norm().sqrt()
    }

    /// Principal square root.
    pub fn sqrt(self) -> Complex {
        let n = self.abs();
        if n == 0.0 {
            return Complex::new(0.0, 0.0);
        }
        let t1 = (0.5 * (n + self.re.abs())).sqrt();
        let t2 = 0.5 * self.im / t1;

        if self.re >= 0.0 {
            Complex::new(t1, t2)
        } else {
            Complex::new(t2.abs(), t1.copysign(self.im))
        }
    }
}

impl From<f32> for Complex {
    fn from(re: f32) -> Self {
        Complex::new(re, 0.0)
    }
}

impl Neg for Complex {
    type Output = Complex;
    fn neg(self) -> Complex {
        Complex::new(-self.re, -self.im)
    }
}

impl Add for Complex {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::new(self.re + rhs.re, self.im + rhs.im)
    }
}

impl Sub for Complex {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::new(self.re - rhs.re, self.im - rhs.im)
    }
}

impl Mul for Complex {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        Complex::new(
            self.re * rhs.re - self.im * rhs.im,
            self.re * rhs.im + self.im * rhs.re,
        )
    }
}

impl Div for Complex {
    type Output = Complex;
    fn div(self, rhs: Complex) -> Complex {
        let scale = 1.0 / rhs.norm();
        Complex::new(
            scale * (self.re * rhs.re + self.im * rhs.im),
            scale * (self.im * rhs.re - self.re * rhs.im),
        )
    }
}

// Mixed real/complex arithmetic

impl Add<Complex> for f32 {
    type Output = Complex;
    fn add(self, rhs: Complex) -> Complex {
        Complex::from(self) + rhs
    }
}

impl Sub<Complex> for f32 {
    type Output = Complex;
    fn sub(self, rhs: Complex) -> Complex {
        Complex::from(self) - rhs
    }
}

impl Mul<f32> for Complex {
    type Output = Complex;
    fn mul(self, rhs: f32) -> Complex {
        Complex::new(self.re * rhs, self.im * rhs)
    }
}

impl Mul<Complex> for f32 {
    type Output = Complex;
    fn mul(self, rhs: Complex) -> Complex {
        rhs * self
    }
}

impl Div<Complex> for f32 {
    type Output = Complex;
    fn div(self, rhs: Complex) -> Complex {
        Complex::from(self) / rhs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(a: Complex, b: Complex) {
        assert!((a.re - b.re).abs() < 1e-5 && (a.im - b.im).abs() < 1e-5, "{a:?} != {b:?}");
    }

    #[test]
    fn test_mul_div_inverse() {
        let a = Complex::new(1.5, -2.0);
        let b = Complex::new(0.3, 0.7);
        assert_close((a * b) / b, a);
        assert_close(a * Complex::new(0.0, 1.0), Complex::new(2.0, 1.5));
    }

    #[test]
    fn test_norm_is_squared_magnitude() {
        assert_eq!(Complex::new(3.0, 4.0).norm(), 25.0);
        assert_eq!(Complex::new(3.0, 4.0).abs(), 5.0);
    }

    #[test]
    fn test_sqrt_squares_back() {
        for z in [
            Complex::new(4.0, 0.0),
            Complex::new(-4.0, 0.0),
            Complex::new(0.2, -3.0),
            Complex::new(-1.3, 0.8),
        ] {
            let r = z.sqrt();
            assert_close(r * r, z);
            // Principal branch
            assert!(r.re >= 0.0);
        }
        assert_close(Complex::new(-4.0, 0.0).sqrt(), Complex::new(0.0, 2.0));
    }

    #[test]
    fn test_mixed_real_ops() {
        let z = Complex::new(1.0, 1.0);
        assert_close(1.0 - z, Complex::new(0.0, -1.0));
        assert_close(2.0 * z, Complex::new(2.0, 2.0));
        assert_close(1.0 / z, Complex::new(0.5, -0.5));
    }
}
