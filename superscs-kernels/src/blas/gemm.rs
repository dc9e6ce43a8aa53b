//! Cache-blocked dense GEMM (L1): `C <- beta * C + alpha * A * B`.
//!
//! Follows the classic ULMBLAS outer-product shape: an `MC x KC` panel of `A`
//! and a `KC x NC` panel of `B` are packed into contiguous scratch, then
//! combined with a register micro-kernel of size `MR x NR`. Block sizes are
//! implementation-defined; they only affect cache behaviour, never the
//! result (accumulation order within a `k`-panel is fixed regardless of how
//! panels are sized).

const MC: usize = 64;
const KC: usize = 64;
const NC: usize = 64;
const MR: usize = 4;
const NR: usize = 4;

/// A read-only view of a dense matrix described by (base, row-stride, col-stride).
#[derive(Clone, Copy)]
pub struct MatrixView<'a> {
    data: &'a [f64],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a> MatrixView<'a> {
    pub fn new(data: &'a [f64], rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> Self {
        MatrixView { data, rows, cols, row_stride, col_stride }
    }

    /// Column-packed view: row_stride = 1, col_stride = rows.
    pub fn column_packed(data: &'a [f64], rows: usize, cols: usize) -> Self {
        MatrixView::new(data, rows, cols, 1, rows)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.row_stride + j * self.col_stride]
    }
}

/// A mutable view of a dense matrix described by (base, row-stride, col-stride).
pub struct MatrixViewMut<'a> {
    data: &'a mut [f64],
    rows: usize,
    cols: usize,
    row_stride: usize,
    col_stride: usize,
}

impl<'a> MatrixViewMut<'a> {
    pub fn new(data: &'a mut [f64], rows: usize, cols: usize, row_stride: usize, col_stride: usize) -> Self {
        MatrixViewMut { data, rows, cols, row_stride, col_stride }
    }

    pub fn column_packed(data: &'a mut [f64], rows: usize, cols: usize) -> Self {
        MatrixViewMut::new(data, rows, cols, 1, rows)
    }

    #[inline]
    fn at(&self, i: usize, j: usize) -> f64 {
        self.data[i * self.row_stride + j * self.col_stride]
    }

    #[inline]
    fn set(&mut self, i: usize, j: usize, v: f64) {
        let idx = i * self.row_stride + j * self.col_stride;
        self.data[idx] = v;
    }

    #[inline]
    fn add_at(&mut self, i: usize, j: usize, v: f64) {
        let idx = i * self.row_stride + j * self.col_stride;
        self.data[idx] += v;
    }
}

/// `C <- beta * C + alpha * A * B`, general row/column strides.
///
/// `A` is `m x k`, `B` is `k x n`, `C` is `m x n`. Honors the special cases
/// documented for beta = 0/1, alpha = 0 and degenerate `m*n*k = 0` without
/// entering the blocked main loop.
pub fn gemm_nn(m: usize, n: usize, k: usize, alpha: f64, a: MatrixView, beta: f64, b: MatrixView, mut c: MatrixViewMut) {
    debug_assert_eq!(a.rows, m);
    debug_assert_eq!(a.cols, k);
    debug_assert_eq!(b.rows, k);
    debug_assert_eq!(b.cols, n);
    debug_assert_eq!(c.rows, m);
    debug_assert_eq!(c.cols, n);

    if m == 0 || n == 0 || k == 0 {
        if beta == 0.0 {
            for j in 0..n {
                for i in 0..m {
                    c.set(i, j, 0.0);
                }
            }
        } else if beta != 1.0 {
            for j in 0..n {
                for i in 0..m {
                    let v = c.at(i, j) * beta;
                    c.set(i, j, v);
                }
            }
        }
        return;
    }

    if alpha == 0.0 {
        if beta == 0.0 {
            for j in 0..n {
                for i in 0..m {
                    c.set(i, j, 0.0);
                }
            }
        } else if beta != 1.0 {
            for j in 0..n {
                for i in 0..m {
                    let v = c.at(i, j) * beta;
                    c.set(i, j, v);
                }
            }
        }
        return;
    }

    // Apply beta once, up front; the blocked loop below only ever accumulates
    // alpha * A_panel * B_panel contributions on top of the scaled C.
    if beta == 0.0 {
        for j in 0..n {
            for i in 0..m {
                c.set(i, j, 0.0);
            }
        }
    } else if beta != 1.0 {
        for j in 0..n {
            for i in 0..m {
                let v = c.at(i, j) * beta;
                c.set(i, j, v);
            }
        }
    }

    let mut packed_a = vec![0.0_f64; MC * KC];
    let mut packed_b = vec![0.0_f64; KC * NC];

    let mut pc = 0;
    while pc < k {
        let kc = KC.min(k - pc);

        let mut ic = 0;
        while ic < m {
            let mc = MC.min(m - ic);
            // pack A[ic..ic+mc, pc..pc+kc] column-major into packed_a[i + kk*mc]
            for kk in 0..kc {
                for i in 0..mc {
                    packed_a[i + kk * mc] = a.at(ic + i, pc + kk);
                }
            }

            let mut jc = 0;
            while jc < n {
                let nc = NC.min(n - jc);
                // pack B[pc..pc+kc, jc..jc+nc] into packed_b[kk + j*kc]
                for j in 0..nc {
                    for kk in 0..kc {
                        packed_b[kk + j * kc] = b.at(pc + kk, jc + j);
                    }
                }

                micro_kernel(mc, nc, kc, alpha, &packed_a, &packed_b, &mut c, ic, jc);

                jc += nc;
            }
            ic += mc;
        }
        pc += kc;
    }
}

/// Register micro-kernel: `C[ic.., jc..] += alpha * packed_a * packed_b` over an `mc x nc x kc` block,
/// unrolled in `MR x NR` register tiles with a scalar tail.
fn micro_kernel(mc: usize, nc: usize, kc: usize, alpha: f64, packed_a: &[f64], packed_b: &[f64], c: &mut MatrixViewMut, ic: usize, jc: usize) {
    let mut jj = 0;
    while jj < nc {
        let nr = NR.min(nc - jj);
        let mut ii = 0;
        while ii < mc {
            let mr = MR.min(mc - ii);
            for j in 0..nr {
                for i in 0..mr {
                    let mut acc = 0.0;
                    for kk in 0..kc {
                        acc += packed_a[(ii + i) + kk * mc] * packed_b[kk + (jj + j) * kc];
                    }
                    c.add_at(ic + ii + i, jc + jj + j, alpha * acc);
                }
            }
            ii += mr;
        }
        jj += nr;
    }
}

/// `C <- beta * C + alpha * A * B`, all three matrices column-packed.
pub fn gemm_cp(m: usize, n: usize, k: usize, alpha: f64, a: &[f64], beta: f64, b: &[f64], c: &mut [f64]) {
    let av = MatrixView::column_packed(a, m, k);
    let bv = MatrixView::column_packed(b, k, n);
    let cv = MatrixViewMut::column_packed(c, m, n);
    gemm_nn(m, n, k, alpha, av, beta, bv, cv);
}

/// `C <- beta * C + alpha * A^T * B`, where `A` is physically stored `(k, m)` column-packed
/// (i.e. exactly the layout of the un-transposed matrix you want to multiply by its transpose),
/// and `B`/`C` are column-packed as usual.
pub fn gemm_tn_cp(m: usize, n: usize, k: usize, alpha: f64, a: &[f64], beta: f64, b: &[f64], c: &mut [f64]) {
    // Physical storage is (k, m) column-packed: row-stride 1, col-stride k.
    // Consumed logically as (m, k): swap the stride roles.
    let av = MatrixView::new(a, m, k, k, 1);
    let bv = MatrixView::column_packed(b, k, n);
    let cv = MatrixViewMut::column_packed(c, m, n);
    gemm_nn(m, n, k, alpha, av, beta, bv, cv);
}
