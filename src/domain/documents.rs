use crate::entities::business_entity::DocumentType;
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DNI_RE: Regex = Regex::new(r"^\d{8}$").expect("valid DNI regex");
    static ref RUC_RE: Regex = Regex::new(r"^\d{11}$").expect("valid RUC regex");
    static ref CE_RE: Regex = Regex::new(r"^[A-Za-z0-9]{6,12}$").expect("valid CE regex");
}

/// Validates a document number against its document type.
///
/// DNI is exactly 8 digits and RUC exactly 11; a carnet de extranjería is
/// 6-12 alphanumerics. Returns a human-readable rule description on failure.
pub fn validate_document_number(
    document_type: DocumentType,
    number: &str,
) -> Result<(), &'static str> {
    let ok = match document_type {
        DocumentType::Dni => DNI_RE.is_match(number),
        DocumentType::Ruc => RUC_RE.is_match(number),
        DocumentType::Ce => CE_RE.is_match(number),
    };
    if ok {
        Ok(())
    } else {
        Err(match document_type {
            DocumentType::Dni => "DNI must be exactly 8 digits",
            DocumentType::Ruc => "RUC must be exactly 11 digits",
            DocumentType::Ce => "CE must be 6 to 12 alphanumeric characters",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(DocumentType::Dni, "12345678", true)]
    #[case(DocumentType::Dni, "1234567", false)]
    #[case(DocumentType::Dni, "123456789", false)]
    #[case(DocumentType::Dni, "1234567a", false)]
    #[case(DocumentType::Ruc, "20123456789", true)]
    #[case(DocumentType::Ruc, "2012345678", false)]
    #[case(DocumentType::Ce, "X1234567", true)]
    #[case(DocumentType::Ce, "ab1", false)]
    fn document_number_rules(
        #[case] document_type: DocumentType,
        #[case] number: &str,
        #[case] ok: bool,
    ) {
        assert_eq!(validate_document_number(document_type, number).is_ok(), ok);
    }
}
