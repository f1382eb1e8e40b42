//! Batch resolution of eBird taxonomy entries.

use serde_json::Value;

use super::Orchestrator;
use crate::Error;
use crate::cache::{CacheKey, Table, now_epoch};
use crate::model::EBirdSpecies;

fn taxon_key(species_code: &str) -> CacheKey {
    CacheKey::new().with("species_id", species_code)
}

impl Orchestrator {
    /// Taxonomy entries for `species_codes`, in the requested order.
    ///
    /// Cached codes are read from the store; every missing code is fetched
    /// in a single upstream call. Returned entries are stored under their own
    /// `speciesCode`. A code still absent afterwards fails the whole batch
    /// with [`Error::UnresolvedRequiredEntity`].
    pub async fn retrieve_species_taxons(&self, species_codes: &[String]) -> Result<Vec<EBirdSpecies>, Error> {
        let table = Table::SpeciesTaxonomy;

        let mut missing: Vec<String> = Vec::new();
        for code in species_codes {
            if self.db.get(table, &taxon_key(code)).await?.is_none() && !missing.contains(code) {
                missing.push(code.clone());
            }
        }

        if missing.is_empty() {
            tracing::debug!(count = species_codes.len(), "all taxonomy entries cached");
        } else {
            self.fetch_taxons(&missing).await?;
        }

        let mut resolved = Vec::with_capacity(species_codes.len());
        for code in species_codes {
            let entry = self
                .db
                .get(table, &taxon_key(code))
                .await?
                .ok_or_else(|| Error::UnresolvedRequiredEntity(code.clone()))?;
            resolved.push(EBirdSpecies::from_json(&entry)?);
        }
        Ok(resolved)
    }

    async fn fetch_taxons(&self, missing: &[String]) -> Result<(), Error> {
        let table = Table::SpeciesTaxonomy;
        let fetched_at = now_epoch();
        tracing::info!(table = %table, count = missing.len(), "cache miss, calling upstream");

        let payload = self.ebird.taxonomy(missing).await.map_err(Error::Source)?;
        self.pace().await;

        let Value::Array(entries) = payload else {
            return Err(Error::MalformedSourcePayload("taxonomy response is not a list".into()));
        };

        for entry in entries {
            let Some(code) = EBirdSpecies::code_of(&entry).map(str::to_string) else {
                let err = Error::MalformedSourcePayload(format!("taxonomy entry without speciesCode: {entry}"));
                tracing::warn!(error = %err, "dropping taxonomy entry");
                continue;
            };
            self.db.put(table, &taxon_key(&code), &entry, fetched_at).await?;
        }
        Ok(())
    }

    /// Every species ever reported in a region, in eBird taxonomic order.
    pub async fn find_species_in_region(&self, region_code: &str) -> Result<Vec<EBirdSpecies>, Error> {
        let codes = self.retrieve_species_list(region_code).await?;
        self.retrieve_species_taxons(&codes).await
    }
}
