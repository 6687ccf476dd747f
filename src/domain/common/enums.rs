//! OCPI code tables

use crate::domain::ocpi::OcpiVersion;
use crate::support::enums::ocpi_enum;

ocpi_enum!(
    /// Type of token used to authorize a session.
    TokenType, "token type", fallback = Other {
        AdHocUser => "AD_HOC_USER",
        AppUser => "APP_USER",
        Other => "OTHER",
        Rfid => "RFID",
    }
);

impl TokenType {
    /// Token types defined by the given protocol version.
    pub fn is_supported_in(&self, version: OcpiVersion) -> bool {
        match self {
            Self::Other | Self::Rfid => true,
            Self::AdHocUser | Self::AppUser => version >= OcpiVersion::V2_2,
        }
    }
}

ocpi_enum!(
    /// ISO 639-1 language of a display text.
    Language, "language", fallback = Unknown {
        Cs => "cs",
        Da => "da",
        De => "de",
        En => "en",
        Es => "es",
        Fi => "fi",
        Fr => "fr",
        It => "it",
        Nl => "nl",
        No => "no",
        Pl => "pl",
        Pt => "pt",
        Sv => "sv",
        Unknown => "unknown",
    }
);

ocpi_enum!(
    /// Operational status of an EVSE.
    EvseStatus, "EVSE status", fallback = Unknown {
        Available => "AVAILABLE",
        Blocked => "BLOCKED",
        Charging => "CHARGING",
        Inoperative => "INOPERATIVE",
        OutOfOrder => "OUTOFORDER",
        Planned => "PLANNED",
        Removed => "REMOVED",
        Reserved => "RESERVED",
        Unknown => "UNKNOWN",
    }
);

ocpi_enum!(
    /// What an image depicts.
    ImageCategory, "image category", fallback = Other {
        Charger => "CHARGER",
        Entrance => "ENTRANCE",
        Location => "LOCATION",
        Network => "NETWORK",
        Operator => "OPERATOR",
        Other => "OTHER",
        Owner => "OWNER",
    }
);

ocpi_enum!(
    /// Functionality offered by a charging station or EVSE.
    Capability, "capability" {
        ChargingProfileCapable => "CHARGING_PROFILE_CAPABLE",
        ChargingPreferencesCapable => "CHARGING_PREFERENCES_CAPABLE",
        ChipCardSupport => "CHIP_CARD_SUPPORT",
        ContactlessCardSupport => "CONTACTLESS_CARD_SUPPORT",
        CreditCardPayable => "CREDIT_CARD_PAYABLE",
        DebitCardPayable => "DEBIT_CARD_PAYABLE",
        PedTerminal => "PED_TERMINAL",
        RemoteStartStopCapable => "REMOTE_START_STOP_CAPABLE",
        Reservable => "RESERVABLE",
        RfidReader => "RFID_READER",
        StartSessionConnectorRequired => "START_SESSION_CONNECTOR_REQUIRED",
        TokenGroupCapable => "TOKEN_GROUP_CAPABLE",
        UnlockCapable => "UNLOCK_CAPABLE",
    }
);

ocpi_enum!(
    /// Plug or socket standard of a connector.
    ConnectorType, "connector type" {
        Chademo => "CHADEMO",
        ChaoJi => "CHAOJI",
        DomesticA => "DOMESTIC_A",
        DomesticB => "DOMESTIC_B",
        DomesticC => "DOMESTIC_C",
        DomesticD => "DOMESTIC_D",
        DomesticE => "DOMESTIC_E",
        DomesticF => "DOMESTIC_F",
        DomesticG => "DOMESTIC_G",
        DomesticH => "DOMESTIC_H",
        DomesticI => "DOMESTIC_I",
        DomesticJ => "DOMESTIC_J",
        DomesticK => "DOMESTIC_K",
        DomesticL => "DOMESTIC_L",
        GbtAc => "GBT_AC",
        GbtDc => "GBT_DC",
        Iec603092Single16 => "IEC_60309_2_single_16",
        Iec603092Three16 => "IEC_60309_2_three_16",
        Iec603092Three32 => "IEC_60309_2_three_32",
        Iec603092Three64 => "IEC_60309_2_three_64",
        Iec62196T1 => "IEC_62196_T1",
        Iec62196T1Combo => "IEC_62196_T1_COMBO",
        Iec62196T2 => "IEC_62196_T2",
        Iec62196T2Combo => "IEC_62196_T2_COMBO",
        Iec62196T3A => "IEC_62196_T3A",
        Iec62196T3C => "IEC_62196_T3C",
        Nema520 => "NEMA_5_20",
        Nema630 => "NEMA_6_30",
        Nema650 => "NEMA_6_50",
        Nema1030 => "NEMA_10_30",
        Nema1050 => "NEMA_10_50",
        Nema1430 => "NEMA_14_30",
        Nema1450 => "NEMA_14_50",
        PantographBottomUp => "PANTOGRAPH_BOTTOM_UP",
        PantographTopDown => "PANTOGRAPH_TOP_DOWN",
        TeslaR => "TESLA_R",
        TeslaS => "TESLA_S",
    }
);

ocpi_enum!(
    ConnectorFormat, "connector format" {
        Socket => "SOCKET",
        Cable => "CABLE",
    }
);

ocpi_enum!(
    PowerType, "power type" {
        Ac1Phase => "AC_1_PHASE",
        Ac2Phase => "AC_2_PHASE",
        Ac2PhaseSplit => "AC_2_PHASE_SPLIT",
        Ac3Phase => "AC_3_PHASE",
        Dc => "DC",
    }
);
