// src/services/pricing.rs
//
// O motor de preço. Função pura: configuração + catálogo resolvido +
// constantes globais -> detalhamento itemizado. Nada aqui toca o banco
// ou qualquer outro efeito colateral, então pode rodar em paralelo sem
// limite e é testável sem infraestrutura.
//
// A ordem das etapas e os valores-padrão reproduzem o cálculo histórico:
// orçamentos antigos precisam continuar recalculáveis ao centavo.

use thiserror::Error;

use crate::models::{
    catalog::ChassisType,
    quote::{AccessoryLine, PriceBreakdown, QuoteConfiguration},
};

// ---
// Valores-padrão do motor
// ---
// Fallbacks de degradação: um nome de vidro/perfil/acabamento que não
// existe no catálogo NÃO é erro, o cálculo segue com estes valores.
// (Só o tipo de châssis é obrigatório, porque sem os limites não há
// como validar as dimensões.)
pub const DEFAULT_VAT_RATE: f64 = 0.20;
pub const DEFAULT_LOSS_COEFFICIENT: f64 = 1.1;
pub const DEFAULT_LABOR_COST: f64 = 50.0;
pub const DEFAULT_GLAZING_PRICE_PER_M2: f64 = 100.0;
pub const DEFAULT_PROFILE_PRICE_PER_METER: f64 = 50.0;
pub const DEFAULT_FINISH_COEFFICIENT: f64 = 1.0;

// ---
// Resultado de uma busca no catálogo
// ---
// Soma explícita em vez de Option para os testes poderem afirmar qual
// caminho (valor do catálogo x padrão do motor) foi tomado.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CatalogLookup<T> {
    Found(T),
    UseDefault,
}

impl<T> CatalogLookup<T> {
    pub fn from_option(opt: Option<T>) -> Self {
        match opt {
            Some(v) => CatalogLookup::Found(v),
            None => CatalogLookup::UseDefault,
        }
    }

    pub fn value_or(self, default: T) -> T {
        match self {
            CatalogLookup::Found(v) => v,
            CatalogLookup::UseDefault => default,
        }
    }

    pub fn is_default(&self) -> bool {
        matches!(self, CatalogLookup::UseDefault)
    }
}

// Acessório já resolvido contra o catálogo.
// unit_price None = nome desconhecido (será pulado em silêncio).
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAccessory {
    pub name: String,
    pub quantity: i32,
    pub unit_price: Option<f64>,
}

// Tudo o que o motor precisa do catálogo, já buscado pelo chamador.
#[derive(Debug, Clone)]
pub struct ResolvedCatalog {
    // None -> UnknownChassisType (lookup obrigatório)
    pub chassis: Option<ChassisType>,
    pub glazing_price_per_m2: CatalogLookup<f64>,
    pub profile_price_per_meter: CatalogLookup<f64>,
    pub finish_coefficient: CatalogLookup<f64>,
    pub accessories: Vec<ResolvedAccessory>,
}

// Constantes globais (tabela config). None = chave ausente, usa o padrão.
#[derive(Debug, Clone, Default)]
pub struct PricingGlobals {
    // Armazenada em percentual ("20" -> 20.0)
    pub vat_rate_percent: Option<f64>,
    pub loss_coefficient: Option<f64>,
    pub labor_cost: Option<f64>,
}

// ---
// Erros de validação do motor
// ---
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PricingError {
    #[error("Largura e altura devem ser maiores que 0.")]
    InvalidDimension,

    #[error("Tipo de châssis inválido: {0}")]
    UnknownChassisType(String),

    #[error("A largura deve estar entre {min} e {max} mm.")]
    WidthOutOfRange { min: i32, max: i32 },

    #[error("A altura deve estar entre {min} e {max} mm.")]
    HeightOutOfRange { min: i32, max: i32 },
}

// Arredondamento só na borda de saída; as etapas internas trabalham com
// a precisão completa do f64.
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Calcula o detalhamento de preço de uma configuração.
///
/// A ordem das etapas é fixa e não pode mudar sem quebrar a
/// reprodutibilidade dos orçamentos já emitidos.
pub fn compute_breakdown(
    config: &QuoteConfiguration,
    catalog: &ResolvedCatalog,
    globals: &PricingGlobals,
) -> Result<PriceBreakdown, PricingError> {
    let width_mm = config.width;
    let height_mm = config.height;

    // 1. Dimensões positivas
    if width_mm <= 0.0 || height_mm <= 0.0 {
        return Err(PricingError::InvalidDimension);
    }

    // 2. Châssis obrigatório + limites dimensionais
    let chassis = catalog
        .chassis
        .as_ref()
        .ok_or_else(|| PricingError::UnknownChassisType(config.chassis_type.clone()))?;

    if width_mm < chassis.min_width as f64 || width_mm > chassis.max_width as f64 {
        return Err(PricingError::WidthOutOfRange {
            min: chassis.min_width,
            max: chassis.max_width,
        });
    }
    if height_mm < chassis.min_height as f64 || height_mm > chassis.max_height as f64 {
        return Err(PricingError::HeightOutOfRange {
            min: chassis.min_height,
            max: chassis.max_height,
        });
    }

    // 3. Grandezas geométricas
    let surface_m2 = (width_mm * height_mm) / 1_000_000.0;
    let perimeter_m = 2.0 * (width_mm + height_mm) / 1000.0;

    // 4. Constantes globais
    let vat_rate = globals
        .vat_rate_percent
        .map(|p| p / 100.0)
        .unwrap_or(DEFAULT_VAT_RATE);
    let loss_coef = globals.loss_coefficient.unwrap_or(DEFAULT_LOSS_COEFFICIENT);

    // 5. Preços do catálogo (com degradação para os padrões)
    let surface_price = catalog
        .glazing_price_per_m2
        .value_or(DEFAULT_GLAZING_PRICE_PER_M2);
    let linear_price = catalog
        .profile_price_per_meter
        .value_or(DEFAULT_PROFILE_PRICE_PER_METER);
    let finish_coef = catalog
        .finish_coefficient
        .value_or(DEFAULT_FINISH_COEFFICIENT);

    // 6. Bases de superfície e linear
    let base_surface = surface_m2 * surface_price * loss_coef;
    let base_linear = perimeter_m * linear_price;

    // 7. Acessórios: desconhecidos e quantidades <= 0 são pulados
    let mut accessories_total = 0.0_f64;
    let mut accessories_detail = Vec::new();
    for acc in &catalog.accessories {
        if let Some(unit_price) = acc.unit_price {
            if acc.quantity > 0 {
                let price = unit_price * acc.quantity as f64;
                accessories_total += price;
                accessories_detail.push(AccessoryLine {
                    name: acc.name.clone(),
                    quantity: acc.quantity,
                    unit_price: round2(unit_price),
                    total_price: round2(price),
                });
            }
        }
    }

    // 8. Subtotal: o coeficiente de acabamento multiplica o conjunto,
    // acessórios incluídos.
    let subtotal = (base_surface + base_linear + accessories_total) * finish_coef;

    // 9-10. Mão de obra, desconto e impostos
    let labor_price = globals.labor_cost.unwrap_or(DEFAULT_LABOR_COST);

    let total_before_discount = subtotal + labor_price;
    let discount_amount = total_before_discount * (config.discount / 100.0);
    let total_ht = total_before_discount - discount_amount;
    let total_ttc = total_ht * (1.0 + vat_rate);

    // 11. Arredonda só agora, na montagem do detalhamento
    Ok(PriceBreakdown {
        surface_m2: round3(surface_m2),
        perimeter_m: round2(perimeter_m),
        base_price: round2(base_surface + base_linear),
        glazing_cost: round2(base_surface),
        profile_cost: round2(base_linear),
        accessories: accessories_detail,
        accessories_cost: round2(accessories_total),
        finish_coefficient: finish_coef,
        finish_supplement: round2((base_surface + base_linear) * (finish_coef - 1.0)),
        subtotal: round2(subtotal),
        labor: round2(labor_price),
        total_before_discount: round2(total_before_discount),
        discount_percent: config.discount,
        discount_amount: round2(discount_amount),
        total_ht: round2(total_ht),
        vat_rate: round2(vat_rate * 100.0),
        vat_amount: round2(total_ttc - total_ht),
        total_price: round2(total_ttc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use uuid::Uuid;

    fn chassis(min_w: i32, max_w: i32, min_h: i32, max_h: i32) -> ChassisType {
        ChassisType {
            id: Uuid::new_v4(),
            company_id: None,
            name: "Châssis fixe".to_string(),
            description: None,
            min_width: min_w,
            max_width: max_w,
            min_height: min_h,
            max_height: max_h,
        }
    }

    fn config(width: f64, height: f64) -> QuoteConfiguration {
        QuoteConfiguration {
            chassis_type: "Châssis fixe".to_string(),
            width,
            height,
            profile_series: "Série Fine".to_string(),
            glazing_type: "4mm - Simple".to_string(),
            finish: "Aluminium brut".to_string(),
            accessories: BTreeMap::new(),
            discount: 0.0,
        }
    }

    fn catalog_with(chassis_row: Option<ChassisType>) -> ResolvedCatalog {
        ResolvedCatalog {
            chassis: chassis_row,
            glazing_price_per_m2: CatalogLookup::UseDefault,
            profile_price_per_meter: CatalogLookup::UseDefault,
            finish_coefficient: CatalogLookup::UseDefault,
            accessories: Vec::new(),
        }
    }

    #[test]
    fn exemplo_de_referencia() {
        // 1000x1200, vidro 85/m², perfil 35/m, coef 1.0, perda 1.1,
        // mão de obra 50, IVA 20%, sem acessórios nem desconto.
        let catalog = ResolvedCatalog {
            chassis: Some(chassis(300, 3000, 300, 3000)),
            glazing_price_per_m2: CatalogLookup::Found(85.0),
            profile_price_per_meter: CatalogLookup::Found(35.0),
            finish_coefficient: CatalogLookup::Found(1.0),
            accessories: Vec::new(),
        };
        let globals = PricingGlobals {
            vat_rate_percent: Some(20.0),
            loss_coefficient: Some(1.1),
            labor_cost: Some(50.0),
        };

        let b = compute_breakdown(&config(1000.0, 1200.0), &catalog, &globals).unwrap();

        assert_eq!(b.surface_m2, 1.2);
        assert_eq!(b.perimeter_m, 4.4);
        assert_eq!(b.glazing_cost, 112.2);
        assert_eq!(b.profile_cost, 154.0);
        assert_eq!(b.base_price, 266.2);
        assert_eq!(b.subtotal, 266.2);
        assert_eq!(b.labor, 50.0);
        assert_eq!(b.total_before_discount, 316.2);
        assert_eq!(b.discount_amount, 0.0);
        assert_eq!(b.total_ht, 316.2);
        assert_eq!(b.vat_rate, 20.0);
        assert_eq!(b.total_price, 379.44);
        assert_eq!(b.vat_amount, 63.24);
    }

    #[test]
    fn sem_desconto_ht_igual_ao_total_bruto() {
        let catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        let b = compute_breakdown(&config(1000.0, 1000.0), &catalog, &PricingGlobals::default())
            .unwrap();
        assert_eq!(b.total_before_discount, b.total_ht);
    }

    #[test]
    fn caminho_padrao_quando_catalogo_nao_casa() {
        // Nenhum nome casa: vidro 100, perfil 50, coef 1.0, perda 1.1,
        // mão de obra 50, IVA 20%.
        let catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        assert!(catalog.glazing_price_per_m2.is_default());

        let b = compute_breakdown(&config(1000.0, 1000.0), &catalog, &PricingGlobals::default())
            .unwrap();

        // 1.0*100*1.1 = 110; 4.0*50 = 200; subtotal 310; +50 = 360; *1.2 = 432
        assert_eq!(b.glazing_cost, 110.0);
        assert_eq!(b.profile_cost, 200.0);
        assert_eq!(b.subtotal, 310.0);
        assert_eq!(b.total_ht, 360.0);
        assert_eq!(b.total_price, 432.0);
    }

    #[test]
    fn dimensoes_nao_positivas_sao_rejeitadas() {
        let catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        let globals = PricingGlobals::default();

        assert_eq!(
            compute_breakdown(&config(0.0, 1000.0), &catalog, &globals),
            Err(PricingError::InvalidDimension)
        );
        assert_eq!(
            compute_breakdown(&config(1000.0, -5.0), &catalog, &globals),
            Err(PricingError::InvalidDimension)
        );
    }

    #[test]
    fn chassis_desconhecido_e_fatal() {
        let catalog = catalog_with(None);
        let err = compute_breakdown(&config(1000.0, 1000.0), &catalog, &PricingGlobals::default())
            .unwrap_err();
        assert_eq!(
            err,
            PricingError::UnknownChassisType("Châssis fixe".to_string())
        );
    }

    #[test]
    fn limites_dimensionais_sao_inclusivos() {
        let catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        let globals = PricingGlobals::default();

        // No limite: passa
        assert!(compute_breakdown(&config(3000.0, 3000.0), &catalog, &globals).is_ok());
        assert!(compute_breakdown(&config(300.0, 300.0), &catalog, &globals).is_ok());

        // 1 mm além: falha nomeando o limite violado
        assert_eq!(
            compute_breakdown(&config(3001.0, 1000.0), &catalog, &globals),
            Err(PricingError::WidthOutOfRange { min: 300, max: 3000 })
        );
        assert_eq!(
            compute_breakdown(&config(1000.0, 299.0), &catalog, &globals),
            Err(PricingError::HeightOutOfRange { min: 300, max: 3000 })
        );
    }

    #[test]
    fn acessorios_desconhecidos_e_zerados_sao_pulados() {
        let mut catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        catalog.accessories = vec![
            ResolvedAccessory {
                name: "Crémone standard".into(),
                quantity: 2,
                unit_price: Some(35.0),
            },
            ResolvedAccessory {
                name: "Acessório fantasma".into(),
                quantity: 3,
                unit_price: None, // não cadastrado
            },
            ResolvedAccessory {
                name: "Charnière standard (unité)".into(),
                quantity: 0, // quantidade nula
                unit_price: Some(12.0),
            },
        ];

        let b = compute_breakdown(&config(1000.0, 1000.0), &catalog, &PricingGlobals::default())
            .unwrap();

        assert_eq!(b.accessories_cost, 70.0);
        assert_eq!(b.accessories.len(), 1);
        assert_eq!(b.accessories[0].name, "Crémone standard");
        assert_eq!(b.accessories[0].total_price, 70.0);
    }

    #[test]
    fn acabamento_multiplica_acessorios_mas_suplemento_exibido_nao() {
        // Coeficiente 1.5 com um acessório de 100: o subtotal aplica o
        // coeficiente sobre tudo, mas a linha finish_supplement exibida
        // só considera vidro + perfil.
        let mut catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        catalog.glazing_price_per_m2 = CatalogLookup::Found(100.0);
        catalog.profile_price_per_meter = CatalogLookup::Found(50.0);
        catalog.finish_coefficient = CatalogLookup::Found(1.5);
        catalog.accessories = vec![ResolvedAccessory {
            name: "Serrure 3 points".into(),
            quantity: 1,
            unit_price: Some(100.0),
        }];
        let globals = PricingGlobals {
            vat_rate_percent: Some(20.0),
            loss_coefficient: Some(1.0),
            labor_cost: Some(0.0),
        };

        let b = compute_breakdown(&config(1000.0, 1000.0), &catalog, &globals).unwrap();

        // vidro 100, perfil 200, acessórios 100 -> subtotal (400)*1.5 = 600
        assert_eq!(b.base_price, 300.0);
        assert_eq!(b.subtotal, 600.0);
        // suplemento exibido: 300 * 0.5 = 150 (e não 200)
        assert_eq!(b.finish_supplement, 150.0);
    }

    #[test]
    fn desconto_e_iva_fecham_as_identidades() {
        let mut catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        catalog.glazing_price_per_m2 = CatalogLookup::Found(100.0);
        catalog.profile_price_per_meter = CatalogLookup::Found(50.0);
        let globals = PricingGlobals {
            vat_rate_percent: Some(20.0),
            loss_coefficient: Some(1.0),
            labor_cost: Some(50.0),
        };
        let mut cfg = config(1000.0, 1000.0);
        cfg.discount = 10.0;

        let b = compute_breakdown(&cfg, &catalog, &globals).unwrap();

        // vidro 100 + perfil 200 + 50 = 350; -10% = 315; *1.2 = 378
        assert_eq!(b.total_before_discount, 350.0);
        assert_eq!(b.discount_amount, 35.0);
        assert_eq!(b.total_ht, 315.0);
        assert_eq!(b.total_price, 378.0);
        // total_ttc = total_ht * (1 + IVA) e vat_amount = diferença
        assert_eq!(b.vat_amount, 63.0);
        assert_eq!(b.total_ht + b.vat_amount, b.total_price);
    }

    #[test]
    fn constantes_globais_sobrepoem_os_padroes() {
        let catalog = catalog_with(Some(chassis(300, 3000, 300, 3000)));
        let globals = PricingGlobals {
            vat_rate_percent: Some(10.0),
            loss_coefficient: Some(1.0),
            labor_cost: Some(80.0),
        };

        let b = compute_breakdown(&config(1000.0, 1000.0), &catalog, &globals).unwrap();

        // vidro 1.0*100*1.0 = 100; perfil 200; +80 = 380; *1.1 = 418
        assert_eq!(b.labor, 80.0);
        assert_eq!(b.vat_rate, 10.0);
        assert_eq!(b.total_ht, 380.0);
        assert_eq!(b.total_price, 418.0);
    }
}
