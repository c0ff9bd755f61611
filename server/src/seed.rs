//! Built-in innovation catalog.
//!
//! Seeding upserts on (group, slug), so it can run on every start without
//! changing ids or disturbing recorded votes.

use tracing::{debug, info};
use voteweb_store::{InnovationStore, StoreError};
use voteweb_types::NewInnovation;
use voteweb_utils::slugify;

/// One catalog entry. The slug is derived from the name unless pinned.
#[derive(Clone, Copy, Debug)]
pub struct SeedEntry {
    pub group_slug: &'static str,
    pub division: &'static str,
    pub name: &'static str,
    slug: Option<&'static str>,
}

impl SeedEntry {
    const fn new(group: (&'static str, &'static str), name: &'static str) -> Self {
        Self {
            group_slug: group.0,
            division: group.1,
            name,
            slug: None,
        }
    }

    /// Pin a slug that differs from `slugify(name)`. Published URLs depend on it.
    const fn with_slug(self, slug: &'static str) -> Self {
        Self {
            slug: Some(slug),
            ..self
        }
    }

    pub fn slug(&self) -> String {
        match self.slug {
            Some(slug) => slug.to_string(),
            None => slugify(self.name),
        }
    }

    pub fn to_new_innovation(&self) -> NewInnovation {
        NewInnovation::new(self.group_slug, self.slug(), self.name).with_division(self.division)
    }
}

const PEMPROV: (&str, &str) = ("pemprov-jabar", "PEMERINTAH PROVINSI JAWA BARAT");
const BUMN: (&str, &str) = ("bumn-bumd", "BUMN/BUMD");
const KEMENTERIAN: (&str, &str) = ("kementrian-lembaga-pt", "KEMENTERIAN/LEMBAGA/PT");
const SEKOLAH: (&str, &str) = ("smp-sma-sederajat", "SMP/SMA/SEDERAJAT");
const KOTA: (&str, &str) = ("pemda-kota", "PEMERINTAH DAERAH KOTA");
const KABUPATEN: (&str, &str) = ("pemda-kabupaten", "PEMERINTAH DAERAH KABUPATEN");

pub const SEED_INNOVATIONS: &[SeedEntry] = &[
    SeedEntry::new(PEMPROV, "Jabar Digital Academy"),
    SeedEntry::new(PEMPROV, "Data Potensi Digital Desa ( TAPAL DESA )"),
    SeedEntry::new(PEMPROV, "GISA PRIMA ADMINDUK JABAR"),
    SeedEntry::new(PEMPROV, "Delman Sarah (Model Pemeliharaan Sapi Perah) di Jawa Barat"),
    SeedEntry::new(PEMPROV, "Jabar Form"),

    SeedEntry::new(BUMN, "Alat Pemecah Ombak (APO) Desa Mayangan Subang"),
    SeedEntry::new(BUMN, "SIMOTIP"),
    SeedEntry::new(BUMN, "Aplikasi Pemilu Elektronik (e-Voting)"),
    SeedEntry::new(BUMN, "THR Asyik"),

    SeedEntry::new(KEMENTERIAN, "Instrumen Deteksi Risiko Stunting pada Remaja (Insting)"),
    SeedEntry::new(KEMENTERIAN, "Teknologi Hybrid Taman Sanitasi (HTS) untuk Pencegahan Pencemaran Lingkungan dan Daur Ulang Air"),
    SeedEntry::new(KEMENTERIAN, "MENTARI (Mental Health Remaja Indonesia) Assessment"),
    SeedEntry::new(KEMENTERIAN, "ISOPA (Intelligent Solar Panel)"),
    SeedEntry::new(KEMENTERIAN, "INOVASI SASCHIEVERSITY"),

    SeedEntry::new(SEKOLAH, "TONNETAR (Tongkat Tunanetra Pintar)"),
    SeedEntry::new(SEKOLAH, "Motor Lstrik Dengan Teknologi Finger Print"),
    SeedEntry::new(SEKOLAH, "SAMVING BLOCK (SAMPAH PLASTIK MENJADI PAVING BLOCK)"),
    SeedEntry::new(SEKOLAH, "Penguatan Kompetensi LITNUM Melalui Lesson Study"),
    SeedEntry::new(SEKOLAH, "INOVASI SABUN NANAS TSANAWIYAH SATU"),

    SeedEntry::new(KOTA, "Konservasi Mata Air menjadi Ruang Terbuka Hijau/Ruang Publik"),
    SeedEntry::new(KOTA, "Bogor Smart Health"),
    SeedEntry::new(KOTA, "Gerakan Orang Cimahi Pilah Sampah (Grak Ompimpah)"),
    SeedEntry::new(KOTA, "BUNG SENJA (Tabungan Sedot Tinja )"),
    SeedEntry::new(KOTA, "SMART - K (Sistem Manajemen Akuakultur, Rekayasa Teknologi dan Kemitraan)"),

    SeedEntry::new(KABUPATEN, "Si Pintar Online"),
    SeedEntry::new(KABUPATEN, "EKONOMI BANGKIT HARAPAN TERBIT: SI DARA PUBER BUKA JALAN SEJAHTERA UNTUK 5.260 ORANG MISKIN DI KABUPATEN SUMEDANG (SISTEM PEMBERDAYAAN MASYARAKAT MISKIN DENGAN PENGEMBANGAN EKONOMI PRODUKTIF MELALUI KELOMPOK USAHA BERSAMA)")
        .with_slug("ekonomi-bangit-harapan-terbit-si-dara-puber-buka-jalan-sejahtera-untuk-5-260-orang-miskin-di-kabupaten-sumedang-sistem-pemberdayaan-masyarakat-miskin-dengan-pengembangan-ekonomi-produktif-melalui-kelompok-usaha-bersama"),
    SeedEntry::new(KABUPATEN, "Sistem Informasi Manajemen Perlindungan Pertanian (SIMARLIN)"),
    SeedEntry::new(KABUPATEN, "KETUPAT LEBARAN (Kegunaan Kartu Kepatuhan Minum Tablet Tambah darah)"),
    SeedEntry::new(KABUPATEN, "NGUPAHAN (NGABAGI, NGUBAH, NGURAI, SAMPAH PANGAN) DINAS KETAHANAN PANGAN KAB.BOGOR"),
    SeedEntry::new(KABUPATEN, "NYAI (INDRAMAYU ARTIFICIAL INTELLIGENCE)"),
];

pub fn seed_innovations() -> Vec<NewInnovation> {
    SEED_INNOVATIONS.iter().map(SeedEntry::to_new_innovation).collect()
}

/// Upsert the whole catalog. Returns the number of entries written.
pub async fn seed_catalog(store: &dyn InnovationStore) -> Result<usize, StoreError> {
    let entries = seed_innovations();
    let total = entries.len();
    info!(total, "seeding innovation catalog");
    for (i, entry) in entries.into_iter().enumerate() {
        let innovation = store.upsert_innovation(entry).await?;
        debug!(
            n = i + 1,
            total,
            group = %innovation.group_slug,
            slug = %innovation.slug,
            "seeded innovation"
        );
    }
    info!(total, "innovation catalog seeded");
    Ok(total)
}
