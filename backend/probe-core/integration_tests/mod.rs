mod client;
mod helpers;
mod session;
