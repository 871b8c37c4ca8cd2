use nalgebra::SVector;

use crate::system::matrix::BlockMatrix;

/// Outcome of one coupled solve. A `converged` of false is a normal result,
/// reported to callers unchanged rather than raised as an error.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveOutcome {
    pub converged: bool,
    pub iterations: usize,
    pub initial_residual: f64,
    pub final_residual: f64,
}

fn dot<const E: usize>(a: &[SVector<f64, E>], b: &[SVector<f64, E>]) -> f64 {
    a.iter().zip(b.iter()).map(|(x, y)| x.dot(y)).sum()
}

fn norm<const E: usize>(v: &[SVector<f64, E>]) -> f64 {
    dot(v, v).sqrt()
}

/// Unpreconditioned BiCGStab over the block LDU structure. `x` carries the
/// initial guess in and the solution out.
pub fn solve_coupled<const E: usize>(
    a: &BlockMatrix<E>,
    b: &[SVector<f64, E>],
    x: &mut [SVector<f64, E>],
    max_iter: usize,
    tol: f64,
) -> SolveOutcome {
    let n = b.len();
    let mut r = vec![SVector::zeros(); n];
    a.mul_vec(x, &mut r);
    // r = b - Ax
    for i in 0..n {
        r[i] = b[i] - r[i];
    }

    let init_resid = norm(&r);
    if init_resid < tol {
        return SolveOutcome {
            converged: true,
            iterations: 0,
            initial_residual: init_resid,
            final_residual: init_resid,
        };
    }

    let r0 = r.clone();
    let mut rho_old = 1.0;
    let mut alpha = 1.0;
    let mut omega = 1.0;
    let mut v = vec![SVector::zeros(); n];
    let mut p = vec![SVector::zeros(); n];
    let mut s = vec![SVector::zeros(); n];
    let mut t = vec![SVector::zeros(); n];

    let mut resid = init_resid;

    for iter in 0..max_iter {
        let rho_new = dot(&r0, &r);
        if rho_new.is_nan() {
            log::warn!("coupled bicgstab: rho is NaN at iter {}", iter);
            return SolveOutcome {
                converged: false,
                iterations: iter,
                initial_residual: init_resid,
                final_residual: f64::NAN,
            };
        }
        if rho_new.abs() < 1e-20 {
            break;
        }

        if iter == 0 {
            p.copy_from_slice(&r);
        } else {
            let beta = (rho_new / rho_old) * (alpha / omega);
            for i in 0..n {
                p[i] = r[i] + beta * (p[i] - omega * v[i]);
            }
        }

        a.mul_vec(&p, &mut v);
        let r0_v = dot(&r0, &v);
        if r0_v.abs() < 1e-20 {
            break;
        }
        alpha = rho_new / r0_v;

        for i in 0..n {
            s[i] = r[i] - alpha * v[i];
        }
        let s_norm = norm(&s);
        if s_norm < tol {
            for i in 0..n {
                x[i] += alpha * p[i];
            }
            return SolveOutcome {
                converged: true,
                iterations: iter + 1,
                initial_residual: init_resid,
                final_residual: s_norm,
            };
        }

        a.mul_vec(&s, &mut t);
        let t_t = dot(&t, &t);
        omega = if t_t.abs() < 1e-20 {
            0.0
        } else {
            dot(&t, &s) / t_t
        };

        for i in 0..n {
            x[i] += alpha * p[i] + omega * s[i];
            r[i] = s[i] - omega * t[i];
        }

        resid = norm(&r);
        if resid > 1e10 {
            log::warn!(
                "coupled bicgstab diverging at iter {}: resid={}",
                iter,
                resid
            );
            return SolveOutcome {
                converged: false,
                iterations: iter,
                initial_residual: init_resid,
                final_residual: resid,
            };
        }
        if resid < tol {
            return SolveOutcome {
                converged: true,
                iterations: iter + 1,
                initial_residual: init_resid,
                final_residual: resid,
            };
        }

        if omega.abs() < 1e-20 {
            break;
        }
        rho_old = rho_new;
    }

    SolveOutcome {
        converged: resid < tol,
        iterations: max_iter,
        initial_residual: init_resid,
        final_residual: resid,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mesh::Mesh;
    use nalgebra::Vector2;

    fn identity_system(n: usize) -> BlockMatrix<2> {
        let mesh = Mesh::line(n);
        let mut m = BlockMatrix::<2>::new(&mesh);
        for cell in 0..n {
            m.add_diag(cell, 0, 0, 1.0);
            m.add_diag(cell, 1, 1, 1.0);
        }
        m
    }

    #[test]
    fn identity_solve_returns_rhs() {
        let m = identity_system(4);
        let b: Vec<Vector2<f64>> = (0..4).map(|i| Vector2::new(i as f64, -1.0)).collect();
        let mut x = vec![Vector2::zeros(); 4];
        let outcome = solve_coupled(&m, &b, &mut x, 50, 1e-10);
        assert!(outcome.converged);
        assert!(outcome.iterations <= 2);
        for (xi, bi) in x.iter().zip(b.iter()) {
            assert!((xi - bi).norm() < 1e-9, "x={} b={}", xi, bi);
        }
    }

    #[test]
    fn zero_rhs_with_zero_guess_converges_immediately() {
        let m = identity_system(3);
        let b = vec![Vector2::zeros(); 3];
        let mut x = vec![Vector2::zeros(); 3];
        let outcome = solve_coupled(&m, &b, &mut x, 10, 1e-12);
        assert!(outcome.converged);
        assert_eq!(outcome.iterations, 0);
        assert_eq!(outcome.initial_residual, 0.0);
    }

    #[test]
    fn tridiagonal_blocks_converge_to_unit_profile() {
        // classic (-1, 2, -1) rows in both block components; rhs pins the
        // ends so the exact solution is 1 everywhere
        let n = 8;
        let mesh = Mesh::line(n);
        let mut m = BlockMatrix::<2>::new(&mesh);
        for cell in 0..n {
            for c in 0..2 {
                m.add_diag(cell, c, c, 2.0);
            }
        }
        for face in 0..mesh.num_faces() {
            for c in 0..2 {
                m.add_upper(face, c, c, -1.0);
                m.add_lower(face, c, c, -1.0);
            }
        }
        let mut b = vec![Vector2::zeros(); n];
        b[0] = Vector2::new(1.0, 1.0);
        b[n - 1] = Vector2::new(1.0, 1.0);

        let mut x = vec![Vector2::zeros(); n];
        let outcome = solve_coupled(&m, &b, &mut x, 200, 1e-10);
        assert!(outcome.converged, "final residual {}", outcome.final_residual);
        assert!(outcome.final_residual < 1e-10);
        assert!(outcome.initial_residual > outcome.final_residual);
        for xi in &x {
            assert!((xi[0] - 1.0).abs() < 1e-8, "x0={}", xi[0]);
            assert!((xi[1] - 1.0).abs() < 1e-8, "x1={}", xi[1]);
        }
    }

    #[test]
    fn iteration_cap_reports_non_convergence() {
        let n = 32;
        let mesh = Mesh::line(n);
        let mut m = BlockMatrix::<2>::new(&mesh);
        for cell in 0..n {
            for c in 0..2 {
                m.add_diag(cell, c, c, 2.0);
            }
        }
        for face in 0..mesh.num_faces() {
            for c in 0..2 {
                m.add_upper(face, c, c, -1.0);
                m.add_lower(face, c, c, -1.0);
            }
        }
        let b = vec![Vector2::new(1.0, 1.0); n];
        let mut x = vec![Vector2::zeros(); n];
        let outcome = solve_coupled(&m, &b, &mut x, 1, 1e-14);
        assert!(!outcome.converged);
        assert!(outcome.final_residual > 1e-14);
    }
}
