/// Poor man's approx assertion for matrices.
///
/// Works for any pair of matrices with `nrows()`, `ncols()` and `(i, j)` indexing into `f64`,
/// so dense kernels can be compared directly against nalgebra matrices.
#[macro_export]
macro_rules! assert_approx_matrix_eq {
    ($x:expr, $y:expr, abstol = $tol:expr) => {{
        let x = &$x;
        let y = &$y;
        assert_eq!(
            (x.nrows(), x.ncols()),
            (y.nrows(), y.ncols()),
            "Matrices must have the same dimensions."
        );

        let mut max_absdiff: f64 = 0.0;
        for i in 0..x.nrows() {
            for j in 0..x.ncols() {
                let absdiff: f64 = (x[(i, j)] - y[(i, j)]).abs();
                if absdiff.is_nan() || absdiff > max_absdiff {
                    max_absdiff = absdiff;
                }
            }
        }
        let approx_eq = max_absdiff <= $tol;

        if !approx_eq {
            println!("abstol: {:e}", $tol);
            println!("left: {}", x);
            println!("right: {}", y);
            println!("max absdiff: {:e}", max_absdiff);
        }
        assert!(approx_eq);
    }};
}

#[macro_export]
macro_rules! assert_panics {
    ($e:expr) => {{
        use std::panic::catch_unwind;
        use std::stringify;
        let expr_string = stringify!($e);
        let result = catch_unwind(|| $e);
        if result.is_ok() {
            panic!("assert_panics!({}) failed.", expr_string);
        }
    }};
}
