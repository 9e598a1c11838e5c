mod client;

pub use client::RemoteStore;
