//! Field rules and extractors, one module per document type.

mod common;

pub mod aforo;
pub mod carnet;
pub mod comprobante;
pub mod declaracion;
pub mod guia;
pub mod recepcion;
pub mod tact;

pub use aforo::SeleccionAforoExtractor;
pub use carnet::CarnetAduaneroExtractor;
pub use comprobante::ComprobanteTransaccionExtractor;
pub use declaracion::DeclaracionIngresoExtractor;
pub use guia::{detect_format as detect_guia_format, GuiaDespachoExtractor};
pub use recepcion::DocumentoRecepcionExtractor;
pub use tact::{detect_format as detect_naviera, TactAdcExtractor};
