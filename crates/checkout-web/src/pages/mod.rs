//! Page Components

mod checkout;

pub use checkout::CheckoutPageView;
