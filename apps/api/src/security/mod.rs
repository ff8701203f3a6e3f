// Input guards applied before a query reaches any model call.

pub mod injection;
