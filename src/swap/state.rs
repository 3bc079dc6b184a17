use crate::models::{Field, TradeRequest};
use alloy_primitives::{Address, U256};

/// Swap form state: which currencies sit in which field and which amount the
/// user typed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SwapState {
    pub independent_field: Field,
    /// Amount typed into the independent field, in that token's base units.
    pub typed_value: Option<U256>,
    /// Amount computed for the other field.
    pub dependent_value: Option<U256>,
    pub input_currency: Option<Address>,
    pub output_currency: Option<Address>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapAction {
    /// Swap input and output currencies; the typed amount follows its token.
    FlipIndependent,
    SelectCurrency { field: Field, currency: Address },
    UpdateIndependent { field: Field, value: Option<U256> },
    UpdateDependent { value: Option<U256> },
}

impl SwapState {
    pub fn currency(&self, field: Field) -> Option<Address> {
        match field {
            Field::Input => self.input_currency,
            Field::Output => self.output_currency,
        }
    }

    fn set_currency(&mut self, field: Field, currency: Option<Address>) {
        match field {
            Field::Input => self.input_currency = currency,
            Field::Output => self.output_currency = currency,
        }
    }

    /// `(input, output)` amounts as currently shown.
    pub fn amounts(&self) -> (Option<U256>, Option<U256>) {
        match self.independent_field {
            Field::Input => (self.typed_value, self.dependent_value),
            Field::Output => (self.dependent_value, self.typed_value),
        }
    }

    /// The request a quote needs, once both currencies and an amount are set.
    pub fn request(&self) -> Option<TradeRequest> {
        Some(TradeRequest {
            known_amount: self.typed_value?,
            field: self.independent_field,
            token_in: self.input_currency?,
            token_out: self.output_currency?,
        })
    }
}

/// Pure transition: never mutates `state`, always returns the next one.
pub fn reduce(state: &SwapState, action: SwapAction) -> SwapState {
    let mut next = *state;
    match action {
        SwapAction::FlipIndependent => {
            next.input_currency = state.output_currency;
            next.output_currency = state.input_currency;
            next.independent_field = state.independent_field.opposite();
            next.dependent_value = None;
        }
        SwapAction::SelectCurrency { field, currency } => {
            let other = field.opposite();
            if state.currency(other) == Some(currency) {
                // Picking the other side's token swaps the pair.
                next.set_currency(field, Some(currency));
                next.set_currency(other, state.currency(field));
                next.independent_field = state.independent_field.opposite();
                next.dependent_value = None;
            } else if state.currency(field) != Some(currency) {
                next.set_currency(field, Some(currency));
                next.dependent_value = None;
            }
        }
        SwapAction::UpdateIndependent { field, value } => {
            next.independent_field = field;
            next.typed_value = value;
            next.dependent_value = None;
        }
        SwapAction::UpdateDependent { value } => {
            next.dependent_value = value;
        }
    }
    next
}
