//! Proxy factor: the local end of a logical edge whose far end lives on
//! another plane.

use pl_behavior::{Payload, ProxyBinding};
use pl_core::{FactorId, LogicalId, PlaneId};

use crate::{MaxSumError, MaxSumResult};

/// Stands in for `binding.logical_to` towards the local factor
/// `binding.logical_from`.  Values it receives are staged and leave the
/// plane as a `FactorValue` addressed to `binding.physical_to`.
#[derive(Clone, Debug)]
pub struct ProxyFactor {
    binding: ProxyBinding,
    staged:  Option<f64>,
}

impl ProxyFactor {
    pub fn new(binding: ProxyBinding) -> Self {
        Self { binding, staged: None }
    }

    pub fn id(&self) -> FactorId {
        FactorId::Proxy { local: self.binding.logical_from, remote: self.binding.logical_to }
    }

    #[inline]
    pub fn binding(&self) -> ProxyBinding {
        self.binding
    }

    /// The plane hosting the remote factor.
    #[inline]
    pub fn host(&self) -> PlaneId {
        self.binding.physical_to
    }

    pub fn receive(&mut self, from: LogicalId, value: f64) -> MaxSumResult<()> {
        if from != self.binding.logical_from {
            return Err(MaxSumError::ProtocolViolation { factor: self.id(), from });
        }
        self.staged = Some(value);
        Ok(())
    }

    /// Take the staged value as an outbound payload.
    pub fn flush(&mut self) -> Option<Payload> {
        let value = self.staged.take()?;
        Some(Payload::FactorValue { binding: self.binding, value })
    }
}
