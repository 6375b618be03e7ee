// Model and loss seams — the collaborators the harness measures around
//
// The harness never looks inside the model: it toggles inference mode, asks
// for one backend preparation pass, and calls forward. Mode toggling uses
// interior mutability so a shared reference suffices inside the loop, the
// same shape as a Dropout/BatchNorm train-eval switch.

use std::marker::PhantomData;

use clipbench_core::backend::Backend;
use clipbench_core::error::Result;
use clipbench_data::batch::BatchInput;

/// The model collaborator: a callable from batch inputs to an output tensor.
pub trait EvalModel<T> {
    /// Compute the output tensor for one batch.
    fn forward(&self, input: &BatchInput<T>) -> Result<T>;

    /// Toggle inference mode (no parameter updates or gradient tracking).
    ///
    /// Override in models that behave differently under evaluation.
    /// Default is a no-op.
    fn set_inference(&self, _on: bool) {}

    /// Whether the model is currently in inference mode (default: false).
    fn is_inference(&self) -> bool {
        false
    }

    /// Convert the model itself into the representation the resolved backend
    /// requires (e.g. move parameters onto the accelerator, or swap in an
    /// optimized-CPU head). Called exactly once before the loop starts.
    /// Default is a no-op.
    fn prepare(&mut self, _backend: Backend) -> Result<()> {
        Ok(())
    }
}

/// The loss collaborator: a callable from (output, target) to a scalar.
pub trait EvalLoss<T> {
    fn compute(&self, output: &T, target: &T) -> Result<f64>;
}

impl<T, F> EvalLoss<T> for F
where
    F: Fn(&T, &T) -> Result<f64>,
{
    fn compute(&self, output: &T, target: &T) -> Result<f64> {
        self(output, target)
    }
}

/// Scoped inference-mode switch.
///
/// Puts the model into inference mode on entry and restores the previous
/// mode when dropped, so early returns and `?` failures inside the loop
/// cannot leave the model in the wrong mode.
pub struct InferenceGuard<'a, T, M: EvalModel<T> + ?Sized> {
    model: &'a M,
    prev: bool,
    _tensor: PhantomData<fn(T)>,
}

impl<'a, T, M: EvalModel<T> + ?Sized> InferenceGuard<'a, T, M> {
    /// Enter inference mode, remembering the mode to restore.
    pub fn enter(model: &'a M) -> Self {
        let prev = model.is_inference();
        model.set_inference(true);
        InferenceGuard {
            model,
            prev,
            _tensor: PhantomData,
        }
    }
}

impl<T, M: EvalModel<T> + ?Sized> Drop for InferenceGuard<'_, T, M> {
    fn drop(&mut self) {
        self.model.set_inference(self.prev);
    }
}
