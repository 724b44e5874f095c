use crate::UncertainMatrix;

/// Result of [`transitive_closure`].
#[derive(Debug, Clone, PartialEq)]
pub struct Closure {
    /// `I + D + D² + …` up to the last power that was added.
    pub matrix: UncertainMatrix,
    /// Number of powers added after `D`. At least one.
    pub iterations: usize,
    /// Whether the last power fell below the threshold before the cap.
    pub converged: bool,
}

/// Approximates `(I - D)⁻¹` by summing the powers of the square matrix
/// `dependencies` until the last one added is below `threshold` everywhere,
/// or until `max_iterations` powers have been added. `D²` is always added.
///
/// No inversion is involved, so singular and cyclic matrices are fine. A
/// matrix whose powers do not fade out simply runs into the cap.
pub fn transitive_closure(
    dependencies: &UncertainMatrix,
    threshold: f64,
    max_iterations: usize,
) -> Closure {
    let (size, _) = dependencies.dim();

    let mut sum = UncertainMatrix::identity(size).add(dependencies);
    let mut product = dependencies.clone();
    let mut iterations = 0;

    let converged = loop {
        product = product.dot(dependencies);
        sum = sum.add(&product);
        iterations += 1;

        let converged = product.is_below(threshold);
        tracing::trace!(iteration = iterations, converged, "Closure iteration");

        if converged || iterations >= max_iterations {
            break converged;
        }
    };

    if converged {
        tracing::debug!(iterations, "Transitive closure converged");
    } else {
        tracing::warn!(
            iterations,
            threshold,
            "Transitive closure did not converge, keeping the last partial sum"
        );
    }

    Closure {
        matrix: sum,
        iterations,
        converged,
    }
}
