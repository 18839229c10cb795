pub mod client;
pub mod literal;
pub mod queries;

pub use client::{
    BlueClient, ClientSettings, Credentials, Envelope, GraphQlErrorEntry, GraphQlRequest,
    HttpTransport, Transport, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT,
};
pub use literal::{escape, Arguments, Literal};

#[cfg(test)]
mod tests;
