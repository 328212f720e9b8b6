//! Values paired with the hashing work it took to produce them.

use crate::OperationCost;

/// Wrapped operation result with associated cost.
#[must_use]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct CostContext<T> {
    /// Wrapped operation's return value.
    pub value: T,
    /// Cost of the operation.
    pub cost: OperationCost,
}

impl<T> CostContext<T> {
    /// Take wrapped value out adding its cost to provided accumulator.
    pub fn unwrap_add_cost(self, acc_cost: &mut OperationCost) -> T {
        *acc_cost += self.cost;
        self.value
    }

    /// Take wrapped value out dropping cost data.
    pub fn unwrap(self) -> T {
        self.value
    }
}

/// Type alias for `Result` wrapped into `CostContext`.
pub type CostResult<T, E> = CostContext<Result<T, E>>;

/// Extension trait to add costs context to values.
pub trait CostsExt {
    /// Wraps any value into a `CostContext` object with provided costs.
    fn wrap_with_cost(self, cost: OperationCost) -> CostContext<Self>
    where
        Self: Sized,
    {
        CostContext { value: self, cost }
    }
}

impl<T> CostsExt for T {}

/// Like `?` for a plain `Result` inside a function returning a
/// `CostResult`: on error returns early with the costs accumulated before
/// the call.
#[macro_export]
macro_rules! cost_return_on_error_no_add {
    ( &$cost:ident, $($body:tt)+ ) => {
        {
            use $crate::CostsExt;
            let result = { $($body)+ };
            match result {
                Ok(x) => x,
                Err(e) => return Err(e).wrap_with_cost($cost),
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    fn checked_index(index: usize, len: usize) -> Result<usize, String> {
        if index < len {
            Ok(index)
        } else {
            Err(format!("index {index} out of range {len}"))
        }
    }

    fn hash_then_check(payloads: &[&str], index: usize) -> CostResult<usize, String> {
        let mut cost = OperationCost::default();
        for payload in payloads {
            payload
                .len()
                .wrap_with_cost(OperationCost::leaf_hash(payload.len()))
                .unwrap_add_cost(&mut cost);
        }
        let index = cost_return_on_error_no_add!(&cost, checked_index(index, payloads.len()));
        cost += OperationCost::node_hash(128);
        Ok(index).wrap_with_cost(cost)
    }

    #[test]
    fn test_unwrap_add_cost_accumulates() {
        let mut acc = OperationCost::leaf_hash(2);
        let value = "root".wrap_with_cost(OperationCost::node_hash(64));
        assert_eq!(value.unwrap_add_cost(&mut acc), "root");
        assert_eq!(acc.total_hash_calls(), 2);
        assert_eq!(acc.hashed_bytes, 66);
    }

    #[test]
    fn test_no_add_macro_returns_costs_before_the_error() {
        let failed = hash_then_check(&["A", "BB", "CCC"], 7);
        assert_matches!(failed.value, Err(_));
        assert_eq!(failed.cost.hash_byte_calls, 3);
        assert_eq!(failed.cost.hash_node_calls, 0);
        assert_eq!(failed.cost.hashed_bytes, 6);

        let ok = hash_then_check(&["A", "BB", "CCC"], 1);
        assert_eq!(ok.value, Ok(1));
        assert_eq!(ok.cost.total_hash_calls(), 4);
        assert_eq!(ok.unwrap(), Ok(1));
    }
}
