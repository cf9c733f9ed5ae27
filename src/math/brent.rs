use crate::core::qm;
use crate::math::numerics::brackets_zero;
use std::f64::EPSILON;
use std::f64::NAN;
use tracing::trace;

/// Brent's method of root-finding, based on the implementation given in
/// Numerical Recipes in C by Press, Teukolsky, Vetterling and Flannery.
/// The algorithm uses bisection and inverse quadratic interpolation and is
/// guaranteed to find a root, so long as one exists in the given range, and
/// as long as it is allowed sufficient iterations. For smooth functions, it
/// converges very quickly.
///
/// The tolerance is absolute, on the x axis. Errors are returned if the
/// range does not bracket a root, if the objective returns anything other
/// than a finite number, or if max_iter iterations are exhausted.
pub fn zbrent<F>(x1: f64, x2: f64, tol: f64, max_iter: u32, func: &mut F) -> Result<f64, qm::Error>
where
    F: FnMut(f64) -> Result<f64, qm::Error>,
{
    let mut a = x1;
    let mut b = x2;
    let mut c = x2;

    let mut fa = finite(x1, func(a)?)?;
    let mut fb = finite(x2, func(b)?)?;
    if !brackets_zero(fa, fb) {
        return Err(qm::Error::NoRootInBracket(format!(
            "f({})={} and f({})={} have the same sign",
            x1, fa, x2, fb
        )));
    }

    let mut d = NAN;
    let mut e = NAN;
    let mut q;
    let mut r;
    let mut p;

    let mut fc = fb;
    for iter in 0..max_iter {
        if (fb > 0.0 && fc > 0.0) || (fb < 0.0 && fc < 0.0) {
            // rename a, b, c and adjust bounding interval d
            c = a;
            fc = fa;
            d = b - a;
            e = d;
        }
        if fc.abs() < fb.abs() {
            a = b;
            b = c;
            c = a;
            fa = fb;
            fb = fc;
            fc = fa;
        }

        // convergence check
        let tol1 = 2.0 * EPSILON * b.abs() + 0.5 * tol;
        let xm = 0.5 * (c - b);
        trace!(iter, x = b, fx = fb, width = xm.abs(), "zbrent");
        if xm.abs() <= tol1 || fb == 0.0 {
            return Ok(b);
        }

        if e.abs() >= tol1 && fa.abs() > fb.abs() {
            // attempt inverse quadratic interpolation
            let s = fb / fa;
            if a == c {
                p = 2.0 * xm * s;
                q = 1.0 - s;
            } else {
                q = fa / fc;
                r = fb / fc;
                p = s * (2.0 * xm * q * (q - r) - (b - a) * (r - 1.0));
                q = (q - 1.0) * (r - 1.0) * (s - 1.0);
            }
            // check whether in bounds
            if p > 0.0 {
                q = -q;
            }
            p = p.abs();
            let min1 = 3.0 * xm * q - (tol1 * q).abs();
            let min2 = (e * q).abs();
            if 2.0 * p < min1.min(min2) {
                // accept interpolation
                e = d;
                d = p / q;
            } else {
                // interpolation failed, use bisection
                d = xm;
                e = d;
            }
        } else {
            // bounds decreasing too slowly, use bisection
            d = xm;
            e = d;
        }

        // move last best guess to a
        a = b;
        fa = fb;

        // evaluate new trial root
        if d.abs() > tol1 {
            b += d;
        } else {
            b += tol1.abs() * xm.signum();
        }
        fb = finite(b, func(b)?)?;
    }

    Err(qm::Error::NotConverged(format!(
        "maximum of {} iterations exceeded in zbrent",
        max_iter
    )))
}

fn finite(x: f64, fx: f64) -> Result<f64, qm::Error> {
    if fx.is_finite() {
        Ok(fx)
    } else {
        Err(qm::Error::NumericalFailure(format!(
            "objective returned {} at {}",
            fx, x
        )))
    }
}
