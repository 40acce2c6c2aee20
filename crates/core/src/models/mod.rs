//! Domain models shared by the storefront, admin and CLI.

pub mod order;
pub mod shoe;

pub use order::{
    CustomerInfo, NewOrder, Order, OrderItem, OrderLineInput, OrderValidationError,
    ValidCustomer, ValidNewOrder,
};
pub use shoe::{
    Shoe, ShoeDraft, ShoeInput, ShoeValidationError, UnavailableOption, check_options,
};
