// Copyright @yucwang 2026

use super::constants::Float;

use nalgebra::{SMatrix, SVector};

/// Solves `a * x = b` by Gauss-Jordan elimination with partial pivoting.
///
/// The pivot of each column is the first row (among the rows not yet
/// processed) holding the largest absolute value. A singular `a` is not
/// reported: the zero pivot turns into NaN/Inf entries in the result, which
/// downstream geometry treats as "no contact".
pub fn solve<const N: usize, const M: usize>(a: &SMatrix<Float, N, N>,
                                             b: &SMatrix<Float, N, M>) -> SMatrix<Float, N, M> {
    let mut a = *a;
    let mut b = *b;

    for col in 0..N {
        let mut pivot = col;
        let mut pivot_abs = a[(col, col)].abs();
        for row in (col + 1)..N {
            let v = a[(row, col)].abs();
            if v > pivot_abs {
                pivot_abs = v;
                pivot = row;
            }
        }
        if pivot != col {
            a.swap_rows(col, pivot);
            b.swap_rows(col, pivot);
        }

        let recip = 1.0 / a[(col, col)];
        for j in 0..N {
            a[(col, j)] *= recip;
        }
        for j in 0..M {
            b[(col, j)] *= recip;
        }

        for row in 0..N {
            if row == col {
                continue;
            }
            let factor = a[(row, col)];
            if factor == 0.0 {
                continue;
            }
            for j in 0..N {
                let v = a[(col, j)];
                a[(row, j)] -= factor * v;
            }
            for j in 0..M {
                let v = b[(col, j)];
                b[(row, j)] -= factor * v;
            }
        }
    }

    b
}

pub fn inverse<const N: usize>(a: &SMatrix<Float, N, N>) -> SMatrix<Float, N, N> {
    solve(a, &SMatrix::<Float, N, N>::identity())
}

pub fn p_norm<const N: usize>(v: &SVector<Float, N>, p: Float) -> Float {
    v.iter().map(|x| x.abs().powf(p)).sum::<Float>().powf(1.0 / p)
}

/// Component of `b` orthogonal to `a`.
pub fn reject<const N: usize>(a: &SVector<Float, N>, b: &SVector<Float, N>) -> SVector<Float, N> {
    b - a * (a.dot(b) / a.dot(a))
}

/// Mirrors `a` about the plane with unit normal `n`.
pub fn reflect<const N: usize>(a: &SVector<Float, N>, n: &SVector<Float, N>) -> SVector<Float, N> {
    a - n * (2.0 * a.dot(n))
}
