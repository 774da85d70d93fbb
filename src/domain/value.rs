use crate::domain::validation::ValidationError;

use phonenumber::country;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// XMS service plan identifier.
///
/// Invariant: non-empty after trimming. It is part of every request path.
pub struct ServicePlanId(String);

impl ServicePlanId {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "service_plan_id";

    /// Create a validated [`ServicePlanId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Bearer token used to authenticate against XMS.
///
/// Invariant: non-empty. Kept byte for byte; whitespace is part of the secret.
pub struct ApiToken(String);

impl ApiToken {
    /// Name used in validation errors.
    pub const FIELD: &'static str = "token";

    /// Create a validated [`ApiToken`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the validated token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Batch identifier assigned by XMS (`id`).
///
/// Invariant: non-empty after trimming when built with `new`. Values decoded from
/// responses are kept exactly as XMS sent them.
pub struct BatchId(String);

impl BatchId {
    /// Wire field name (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`BatchId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Take a value exactly as XMS returned it.
    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the validated batch id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Group identifier assigned by XMS.
///
/// Invariant: non-empty after trimming when built with `new`. Values decoded from
/// responses are kept exactly as XMS sent them.
pub struct GroupId(String);

impl GroupId {
    /// Wire field name (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`GroupId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Take a value exactly as XMS returned it.
    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the validated group id.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Identifier of an inbound (mobile originated) message.
pub struct InboundId(String);

impl InboundId {
    /// Wire field name (`id`).
    pub const FIELD: &'static str = "id";

    /// Create a validated [`InboundId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Take a value exactly as XMS returned it.
    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Unvalidated address as sent to XMS: an MSISDN, short code, or alphanumeric sender.
///
/// Invariant: non-empty after trimming when built with `new`; decoded values are kept
/// as sent. This type does not normalize; if you want E.164 normalization, parse into
/// [`PhoneNumber`] and convert it into [`Msisdn`].
pub struct Msisdn(String);

impl Msisdn {
    /// Wire field name for recipients (`to`).
    pub const FIELD: &'static str = "to";

    /// Create a validated (non-empty) address.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Take a value exactly as XMS returned it.
    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Raw (trimmed) value as sent to XMS.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<PhoneNumber> for Msisdn {
    /// Convert an already-parsed phone number to its E.164 form.
    fn from(value: PhoneNumber) -> Self {
        Self(value.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Phone number normalized to E.164.
///
/// Useful for turning user input in national or spaced formats into an [`Msisdn`].
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Parse `input`, using `default_region` when it has no country prefix.
    pub fn parse(
        default_region: Option<country::Id>,
        input: &str,
    ) -> Result<Self, ValidationError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ValidationError::Empty {
                field: Msisdn::FIELD,
            });
        }

        let number = phonenumber::parse(default_region, input).map_err(|_| {
            ValidationError::InvalidPhoneNumber {
                input: input.to_owned(),
            }
        })?;
        let e164 = phonenumber::format(&number)
            .mode(phonenumber::Mode::E164)
            .to_string();
        Ok(Self(e164))
    }

    pub fn e164(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Free-form label attached to batches and groups.
///
/// Invariant: non-empty after trimming when built with `new`. Values decoded from
/// responses are kept exactly as XMS sent them.
pub struct Tag(String);

impl Tag {
    /// Wire field name (`tags`).
    pub const FIELD: &'static str = "tags";

    /// Create a validated [`Tag`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Take a value exactly as XMS returned it.
    pub(crate) fn from_wire(value: String) -> Self {
        Self(value)
    }

    /// Borrow the tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Text message body (`body`).
///
/// Invariant: non-empty after trimming. The original value (including whitespace) is preserved.
pub struct MessageText(String);

impl MessageText {
    /// Wire field name (`body`).
    pub const FIELD: &'static str = "body";

    /// Create validated message text.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.trim().is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    /// Borrow the message text as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// Absolute URL XMS posts delivery reports to (`callback_url`).
pub struct CallbackUrl(url::Url);

impl CallbackUrl {
    /// Wire field name (`callback_url`).
    pub const FIELD: &'static str = "callback_url";

    /// Parse and validate an absolute URL.
    pub fn new(value: impl AsRef<str>) -> Result<Self, ValidationError> {
        let value = value.as_ref().trim();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        let url = url::Url::parse(value).map_err(|_| ValidationError::InvalidUrl {
            field: Self::FIELD,
            input: value.to_owned(),
        })?;
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &url::Url {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// How much delivery feedback XMS produces for a batch (`delivery_report`).
pub enum DeliveryReport {
    /// No delivery report.
    None,
    /// One summary callback for the whole batch.
    Summary,
    /// Summary including the recipients of each status.
    Full,
    /// One callback per recipient.
    PerRecipient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_newtypes_trim_or_validate() {
        let plan = ServicePlanId::new("  plan ").unwrap();
        assert_eq!(plan.as_str(), "plan");
        assert!(ServicePlanId::new("  ").is_err());

        let token = ApiToken::new(" secret ").unwrap();
        assert_eq!(token.as_str(), " secret ");
        assert!(ApiToken::new("").is_err());

        let batch = BatchId::new(" 5Z8QsIRsk86f-jHB ").unwrap();
        assert_eq!(batch.as_str(), "5Z8QsIRsk86f-jHB");
        assert!(BatchId::new("\t").is_err());

        let group = GroupId::new("4cldmgEdAcBfcHW3").unwrap();
        assert_eq!(group.as_str(), "4cldmgEdAcBfcHW3");
        assert!(GroupId::new("").is_err());

        assert!(InboundId::new(" ").is_err());

        let tag = Tag::new(" rah ").unwrap();
        assert_eq!(tag.as_str(), "rah");
        assert!(Tag::new("  ").is_err());

        let msg = MessageText::new(" hi ").unwrap();
        assert_eq!(msg.as_str(), " hi ");
        assert!(MessageText::new("  ").is_err());
    }

    #[test]
    fn msisdn_trims_and_exposes_raw() {
        let msisdn = Msisdn::new(" 987654321 ").unwrap();
        assert_eq!(msisdn.as_str(), "987654321");
        assert!(matches!(
            Msisdn::new(""),
            Err(ValidationError::Empty { field: "to" })
        ));
    }

    #[test]
    fn phone_number_parsing_and_equality_use_e164() {
        let p1 = PhoneNumber::parse(None, "+46701234567").unwrap();
        let p2 = PhoneNumber::parse(None, " +46 70 123 45 67 ").unwrap();
        assert_eq!(p1, p2);
        assert_eq!(p1.e164(), "+46701234567");

        let national = PhoneNumber::parse(Some(country::Id::SE), "070-123 45 67").unwrap();
        assert_eq!(national, p1);

        let msisdn: Msisdn = p2.into();
        assert_eq!(msisdn.as_str(), "+46701234567");
        assert!(matches!(
            PhoneNumber::parse(None, "not-a-number"),
            Err(ValidationError::InvalidPhoneNumber { .. })
        ));
        assert!(matches!(
            PhoneNumber::parse(None, "  "),
            Err(ValidationError::Empty { field: "to" })
        ));
    }

    #[test]
    fn callback_url_requires_absolute_url() {
        let url = CallbackUrl::new("https://example.com/dlr").unwrap();
        assert_eq!(url.as_str(), "https://example.com/dlr");
        assert!(matches!(
            CallbackUrl::new("/relative"),
            Err(ValidationError::InvalidUrl { .. })
        ));
        assert!(matches!(
            CallbackUrl::new(" "),
            Err(ValidationError::Empty { .. })
        ));
    }
}
