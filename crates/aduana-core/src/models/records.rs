//! Flat field records for the seven customs document types.
//!
//! String fields default to empty, dates/amounts/counts to `None`. Field names
//! keep the Spanish terms printed on the forms so that serialized output can be
//! matched against the source document by eye.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value that may be absent after extraction.
pub trait FieldValue {
    /// Whether the value counts as "not extracted".
    fn is_blank(&self) -> bool;
}

impl FieldValue for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl<T> FieldValue for Option<T> {
    fn is_blank(&self) -> bool {
        self.is_none()
    }
}

/// Common behaviour of every record type.
pub trait CustomsFields: Default + Clone {
    /// Critical field names paired with whether each one was extracted.
    fn critical_fields(&self) -> Vec<(&'static str, bool)>;

    /// Copy every blank field from `other`, keeping values already present.
    fn fill_missing(&mut self, other: &Self);
}

fn fill<T: FieldValue + Clone>(slot: &mut T, other: &T) {
    if slot.is_blank() && !other.is_blank() {
        *slot = other.clone();
    }
}

/// Carnet aduanero: identity card of a customs agent or dispatcher assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CarnetAduanero {
    /// Printed title (AGENTE DE ADUANA, APODERADO ESPECIAL, ...).
    pub titulo: String,
    pub nombre_completo: String,
    /// Canonical RUT (`12.345.678-9`).
    pub rut: String,
    pub numero_carnet: String,
    pub codigo_agente: String,
    pub aduana: String,
    pub numero_resolucion: String,
    pub fecha_emision: Option<NaiveDate>,
    pub fecha_vencimiento: Option<NaiveDate>,
}

impl CustomsFields for CarnetAduanero {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("titulo", !self.titulo.is_blank()),
            ("nombre_completo", !self.nombre_completo.is_blank()),
            ("rut", !self.rut.is_blank()),
        ]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.titulo, &other.titulo);
        fill(&mut self.nombre_completo, &other.nombre_completo);
        fill(&mut self.rut, &other.rut);
        fill(&mut self.numero_carnet, &other.numero_carnet);
        fill(&mut self.codigo_agente, &other.codigo_agente);
        fill(&mut self.aduana, &other.aduana);
        fill(&mut self.numero_resolucion, &other.numero_resolucion);
        fill(&mut self.fecha_emision, &other.fecha_emision);
        fill(&mut self.fecha_vencimiento, &other.fecha_vencimiento);
    }
}

/// Declaración de ingreso (DIN): import declaration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeclaracionIngreso {
    pub numero_identificacion: String,
    pub fecha_aceptacion: Option<NaiveDate>,
    pub aduana: String,
    pub tipo_operacion: String,
    pub codigo_agente: String,
    pub nombre_agente: String,
    pub consignatario: String,
    pub rut_consignatario: String,
    pub pais_origen: String,
    pub puerto_embarque: String,
    pub puerto_desembarque: String,
    pub via_transporte: String,
    pub numero_manifiesto: String,
    pub documento_transporte: String,
    pub fecha_documento_transporte: Option<NaiveDate>,
    pub total_bultos: Option<u32>,
    /// Gross weight in kilograms.
    pub peso_bruto: Option<Decimal>,
    /// USD amounts.
    pub valor_fob: Option<Decimal>,
    pub valor_flete: Option<Decimal>,
    pub valor_seguro: Option<Decimal>,
    pub valor_cif: Option<Decimal>,
    /// Total duties in pesos.
    pub total_a_pagar: Option<Decimal>,
    /// 26-digit payment barcode.
    pub codigo_barras: String,
}

impl CustomsFields for DeclaracionIngreso {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![("numero_identificacion", !self.numero_identificacion.is_blank())]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.numero_identificacion, &other.numero_identificacion);
        fill(&mut self.fecha_aceptacion, &other.fecha_aceptacion);
        fill(&mut self.aduana, &other.aduana);
        fill(&mut self.tipo_operacion, &other.tipo_operacion);
        fill(&mut self.codigo_agente, &other.codigo_agente);
        fill(&mut self.nombre_agente, &other.nombre_agente);
        fill(&mut self.consignatario, &other.consignatario);
        fill(&mut self.rut_consignatario, &other.rut_consignatario);
        fill(&mut self.pais_origen, &other.pais_origen);
        fill(&mut self.puerto_embarque, &other.puerto_embarque);
        fill(&mut self.puerto_desembarque, &other.puerto_desembarque);
        fill(&mut self.via_transporte, &other.via_transporte);
        fill(&mut self.numero_manifiesto, &other.numero_manifiesto);
        fill(&mut self.documento_transporte, &other.documento_transporte);
        fill(&mut self.fecha_documento_transporte, &other.fecha_documento_transporte);
        fill(&mut self.total_bultos, &other.total_bultos);
        fill(&mut self.peso_bruto, &other.peso_bruto);
        fill(&mut self.valor_fob, &other.valor_fob);
        fill(&mut self.valor_flete, &other.valor_flete);
        fill(&mut self.valor_seguro, &other.valor_seguro);
        fill(&mut self.valor_cif, &other.valor_cif);
        fill(&mut self.total_a_pagar, &other.total_a_pagar);
        fill(&mut self.codigo_barras, &other.codigo_barras);
    }
}

/// Documento de recepción: warehouse receipt for unloaded cargo.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentoRecepcion {
    pub numero_documento: String,
    /// Reception status (RECIBIDO CONFORME, CON OBSERVACIONES, ...).
    pub situacion: String,
    pub numero_manifiesto: String,
    pub fecha_recepcion: Option<NaiveDate>,
    pub almacen: String,
    pub rut_almacen: String,
    pub documento_transporte: String,
    pub consignatario: String,
    pub nave: String,
    pub viaje: String,
    pub contenedor: String,
    pub tipo_bulto: String,
    pub total_bultos: Option<u32>,
    pub peso_recibido: Option<Decimal>,
    /// End of the storage term.
    pub fecha_vencimiento: Option<NaiveDate>,
    pub observaciones: String,
}

impl CustomsFields for DocumentoRecepcion {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("numero_documento", !self.numero_documento.is_blank()),
            ("situacion", !self.situacion.is_blank()),
            ("numero_manifiesto", !self.numero_manifiesto.is_blank()),
        ]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.numero_documento, &other.numero_documento);
        fill(&mut self.situacion, &other.situacion);
        fill(&mut self.numero_manifiesto, &other.numero_manifiesto);
        fill(&mut self.fecha_recepcion, &other.fecha_recepcion);
        fill(&mut self.almacen, &other.almacen);
        fill(&mut self.rut_almacen, &other.rut_almacen);
        fill(&mut self.documento_transporte, &other.documento_transporte);
        fill(&mut self.consignatario, &other.consignatario);
        fill(&mut self.nave, &other.nave);
        fill(&mut self.viaje, &other.viaje);
        fill(&mut self.contenedor, &other.contenedor);
        fill(&mut self.tipo_bulto, &other.tipo_bulto);
        fill(&mut self.total_bultos, &other.total_bultos);
        fill(&mut self.peso_recibido, &other.peso_recibido);
        fill(&mut self.fecha_vencimiento, &other.fecha_vencimiento);
        fill(&mut self.observaciones, &other.observaciones);
    }
}

/// Letterhead detected on a guía de despacho.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GuiaFormat {
    /// Agencia de Aduanas Jorge Stein.
    JorgeStein,
    /// Agencia de Aduanas Alberto Rubio.
    AlbertoRubio,
    #[default]
    Unknown,
}

impl FieldValue for GuiaFormat {
    fn is_blank(&self) -> bool {
        *self == GuiaFormat::Unknown
    }
}

/// Guía de despacho: electronic dispatch guide issued by a customs agency.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GuiaDespacho {
    pub numero_guia: String,
    pub rut_emisor: String,
    pub fecha_documento: Option<NaiveDate>,
    pub formato: GuiaFormat,
    pub razon_social_emisor: String,
    pub rut_receptor: String,
    pub razon_social_receptor: String,
    pub direccion_destino: String,
    pub comuna: String,
    pub patente: String,
    pub chofer: String,
    pub rut_chofer: String,
    pub contenedor: String,
    pub sello: String,
    pub referencia_din: String,
    pub documento_transporte: String,
    pub motivo_traslado: String,
    pub monto_total: Option<Decimal>,
}

impl CustomsFields for GuiaDespacho {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("numero_guia", !self.numero_guia.is_blank()),
            ("rut_emisor", !self.rut_emisor.is_blank()),
            ("fecha_documento", !self.fecha_documento.is_blank()),
        ]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.numero_guia, &other.numero_guia);
        fill(&mut self.rut_emisor, &other.rut_emisor);
        fill(&mut self.fecha_documento, &other.fecha_documento);
        fill(&mut self.formato, &other.formato);
        fill(&mut self.razon_social_emisor, &other.razon_social_emisor);
        fill(&mut self.rut_receptor, &other.rut_receptor);
        fill(&mut self.razon_social_receptor, &other.razon_social_receptor);
        fill(&mut self.direccion_destino, &other.direccion_destino);
        fill(&mut self.comuna, &other.comuna);
        fill(&mut self.patente, &other.patente);
        fill(&mut self.chofer, &other.chofer);
        fill(&mut self.rut_chofer, &other.rut_chofer);
        fill(&mut self.contenedor, &other.contenedor);
        fill(&mut self.sello, &other.sello);
        fill(&mut self.referencia_din, &other.referencia_din);
        fill(&mut self.documento_transporte, &other.documento_transporte);
        fill(&mut self.motivo_traslado, &other.motivo_traslado);
        fill(&mut self.monto_total, &other.monto_total);
    }
}

/// Comprobante de transacción: treasury payment receipt for a DIN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComprobanteTransaccion {
    pub numero_folio: String,
    /// Amount paid in pesos; must be positive to count as extracted.
    pub total_pagado: Option<Decimal>,
    pub fecha_pago: Option<NaiveDate>,
    pub hora_pago: String,
    pub rut_pagador: String,
    pub institucion: String,
    pub numero_operacion: String,
    pub medio_pago: String,
}

impl CustomsFields for ComprobanteTransaccion {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("numero_folio", !self.numero_folio.is_blank()),
            (
                "total_pagado",
                self.total_pagado.is_some_and(|total| total > Decimal::ZERO),
            ),
        ]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.numero_folio, &other.numero_folio);
        fill(&mut self.total_pagado, &other.total_pagado);
        fill(&mut self.fecha_pago, &other.fecha_pago);
        fill(&mut self.hora_pago, &other.hora_pago);
        fill(&mut self.rut_pagador, &other.rut_pagador);
        fill(&mut self.institucion, &other.institucion);
        fill(&mut self.numero_operacion, &other.numero_operacion);
        fill(&mut self.medio_pago, &other.medio_pago);
    }
}

/// Selección de aforo: inspection channel assigned to a DIN.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeleccionAforo {
    pub numero_din: String,
    /// AFORO FISICO, AFORO DOCUMENTAL or SIN AFORO.
    pub tipo_revision: String,
    pub nombre_agente: String,
    /// Agent code, a letter followed by two digits.
    pub codigo_agente: String,
    pub fecha_seleccion: Option<NaiveDate>,
    pub fecha_aceptacion: Option<NaiveDate>,
    pub aduana: String,
    pub importador: String,
    pub rut_importador: String,
    pub numero_manifiesto: String,
    pub documento_transporte: String,
    pub observaciones: String,
}

impl CustomsFields for SeleccionAforo {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("numero_din", !self.numero_din.is_blank()),
            ("tipo_revision", !self.tipo_revision.is_blank()),
            ("nombre_agente", !self.nombre_agente.is_blank()),
        ]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.numero_din, &other.numero_din);
        fill(&mut self.tipo_revision, &other.tipo_revision);
        fill(&mut self.nombre_agente, &other.nombre_agente);
        fill(&mut self.codigo_agente, &other.codigo_agente);
        fill(&mut self.fecha_seleccion, &other.fecha_seleccion);
        fill(&mut self.fecha_aceptacion, &other.fecha_aceptacion);
        fill(&mut self.aduana, &other.aduana);
        fill(&mut self.importador, &other.importador);
        fill(&mut self.rut_importador, &other.rut_importador);
        fill(&mut self.numero_manifiesto, &other.numero_manifiesto);
        fill(&mut self.documento_transporte, &other.documento_transporte);
        fill(&mut self.observaciones, &other.observaciones);
    }
}

/// Shipping line detected on a TATC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TactFormat {
    Maersk,
    Msc,
    IanTaylor,
    #[default]
    Unknown,
}

impl FieldValue for TactFormat {
    fn is_blank(&self) -> bool {
        *self == TactFormat::Unknown
    }
}

/// TATC / ADC: temporary container admission title.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TactAdc {
    pub numero_tatc: String,
    /// ISO 6346 container id without separators (`MSKU1234565`).
    pub numero_contenedor: String,
    pub numero_sello: String,
    pub naviera: TactFormat,
    pub tipo_contenedor: String,
    pub fecha_emision: Option<NaiveDate>,
    pub fecha_vencimiento: Option<NaiveDate>,
    pub nave: String,
    pub viaje: String,
    pub puerto: String,
    pub documento_transporte: String,
    pub consignatario: String,
    pub rut_consignatario: String,
}

impl CustomsFields for TactAdc {
    fn critical_fields(&self) -> Vec<(&'static str, bool)> {
        vec![
            ("numero_tatc", !self.numero_tatc.is_blank()),
            ("numero_contenedor", !self.numero_contenedor.is_blank()),
            ("numero_sello", !self.numero_sello.is_blank()),
        ]
    }

    fn fill_missing(&mut self, other: &Self) {
        fill(&mut self.numero_tatc, &other.numero_tatc);
        fill(&mut self.numero_contenedor, &other.numero_contenedor);
        fill(&mut self.numero_sello, &other.numero_sello);
        fill(&mut self.naviera, &other.naviera);
        fill(&mut self.tipo_contenedor, &other.tipo_contenedor);
        fill(&mut self.fecha_emision, &other.fecha_emision);
        fill(&mut self.fecha_vencimiento, &other.fecha_vencimiento);
        fill(&mut self.nave, &other.nave);
        fill(&mut self.viaje, &other.viaje);
        fill(&mut self.puerto, &other.puerto);
        fill(&mut self.documento_transporte, &other.documento_transporte);
        fill(&mut self.consignatario, &other.consignatario);
        fill(&mut self.rut_consignatario, &other.rut_consignatario);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_string_is_blank() {
        assert!(String::new().is_blank());
        assert!("   ".to_string().is_blank());
        assert!(!"X".to_string().is_blank());
    }

    #[test]
    fn test_total_pagado_must_be_positive() {
        let mut doc = ComprobanteTransaccion {
            numero_folio: "4560010758".to_string(),
            total_pagado: Some(Decimal::ZERO),
            ..Default::default()
        };
        assert!(doc.critical_fields().iter().any(|(_, ok)| !ok));

        doc.total_pagado = Some(Decimal::new(100, 0));
        assert!(doc.critical_fields().iter().all(|(_, ok)| *ok));
    }

    #[test]
    fn test_fill_missing_keeps_first_value() {
        let mut first = GuiaDespacho {
            numero_guia: "11975".to_string(),
            ..Default::default()
        };
        let second = GuiaDespacho {
            numero_guia: "99999".to_string(),
            rut_emisor: "76.123.456-7".to_string(),
            formato: GuiaFormat::AlbertoRubio,
            ..Default::default()
        };

        first.fill_missing(&second);

        assert_eq!(first.numero_guia, "11975");
        assert_eq!(first.rut_emisor, "76.123.456-7");
        assert_eq!(first.formato, GuiaFormat::AlbertoRubio);
    }
}
