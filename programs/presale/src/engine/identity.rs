//! Identity gate: registration with referrer linkage and KYC status.

use anchor_lang::prelude::Pubkey;

use crate::constants::NO_REFERRER;
use crate::error::SaleError;
use crate::state::Participant;

/// Admit `wallet` into the sale, writing a fresh record.
///
/// `referrer_record` must be the referrer's own record whenever `referrer`
/// is not `NO_REFERRER`. Because a referrer has to be registered first and
/// a record is written once, referrer links always form a forest.
pub fn register(
    record: &mut Participant,
    sale: Pubkey,
    wallet: Pubkey,
    referrer: Pubkey,
    referrer_record: Option<&Participant>,
    now: i64,
    bump: u8,
) -> Result<(), SaleError> {
    if record.registered {
        return Err(SaleError::AlreadyRegistered);
    }
    if referrer != NO_REFERRER {
        if referrer == wallet {
            return Err(SaleError::InvalidReferrer);
        }
        let r = referrer_record.ok_or(SaleError::InvalidReferrer)?;
        if !r.registered || r.wallet != referrer || r.sale != sale {
            return Err(SaleError::InvalidReferrer);
        }
    }

    *record = Participant {
        sale,
        wallet,
        referrer,
        registered: true,
        kyc_verified: false,
        registered_at: now,
        bump,
        ..Participant::default()
    };
    Ok(())
}

/// Mark the participant as KYC verified. Idempotent; returns whether the status changed.
pub fn verify_kyc(record: &mut Participant) -> Result<bool, SaleError> {
    if !record.registered {
        return Err(SaleError::NotRegistered);
    }
    if record.kyc_verified {
        return Ok(false);
    }
    record.kyc_verified = true;
    Ok(true)
}

pub fn is_purchase_eligible(record: &Participant) -> bool {
    record.registered && record.kyc_verified
}
