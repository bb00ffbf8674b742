//! In-app purchases that unlock optional report sections.

use serde::{Deserialize, Serialize};

/// Purchasable products, serialized by their store SKU.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InAppPurchase {
    #[serde(rename = "pro_sku_3")]
    SmartReceiptsPlus,
    #[serde(rename = "ocr_purchase_10")]
    OcrScans10,
    #[serde(rename = "ocr_purchase_50")]
    OcrScans50,
}

/// The product line a purchase belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PurchaseFamily {
    SmartReceiptsPlus,
    Ocr,
}

impl InAppPurchase {
    pub fn sku(self) -> &'static str {
        match self {
            InAppPurchase::SmartReceiptsPlus => "pro_sku_3",
            InAppPurchase::OcrScans10 => "ocr_purchase_10",
            InAppPurchase::OcrScans50 => "ocr_purchase_50",
        }
    }

    pub fn family(self) -> PurchaseFamily {
        match self {
            InAppPurchase::SmartReceiptsPlus => PurchaseFamily::SmartReceiptsPlus,
            InAppPurchase::OcrScans10 | InAppPurchase::OcrScans50 => PurchaseFamily::Ocr,
        }
    }
}

/// Read-only view of what the user has bought.
pub trait EntitlementSource {
    fn has_active_purchase(&self, purchase: InAppPurchase) -> bool;
}

/// The user's purchases, as stored alongside a report input.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PurchaseWallet {
    pub active: Vec<InAppPurchase>,
}

impl PurchaseWallet {
    pub fn with_purchase(mut self, purchase: InAppPurchase) -> Self {
        self.add_purchase(purchase);
        self
    }

    pub fn add_purchase(&mut self, purchase: InAppPurchase) {
        if !self.active.contains(&purchase) {
            self.active.push(purchase);
        }
    }
}

impl EntitlementSource for PurchaseWallet {
    fn has_active_purchase(&self, purchase: InAppPurchase) -> bool {
        self.active.contains(&purchase)
    }
}
