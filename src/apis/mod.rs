// HTTP clients for the two external address providers
pub mod kartverket;
pub mod seeiendom;

pub use kartverket::KartverketClient;
pub use seeiendom::SeeiendomClient;
