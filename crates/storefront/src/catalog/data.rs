//! The furniture collection.
//!
//! Declaration order is the catalog's default display order.

use artesania_core::{Price, ProductId};

use crate::models::Product;

/// Static description of one product.
struct ProductSeed {
    id: &'static str,
    title: &'static str,
    category: &'static str,
    price: u64,
    stock: u32,
    description: &'static str,
    materials: &'static [&'static str],
    dimensions: &'static str,
    image: &'static str,
}

impl From<&ProductSeed> for Product {
    fn from(seed: &ProductSeed) -> Self {
        Self {
            id: ProductId::new(seed.id),
            title: seed.title.to_owned(),
            category: seed.category.to_owned(),
            price: Price::ars(seed.price),
            stock: seed.stock,
            description: seed.description.to_owned(),
            materials: seed.materials.iter().map(|&m| m.to_owned()).collect(),
            dimensions: seed.dimensions.to_owned(),
            image: format!("/static/images/products/{}", seed.image),
        }
    }
}

const SEEDS: &[ProductSeed] = &[
    ProductSeed {
        id: "mesa-roble-imperial",
        title: "Mesa Roble Imperial",
        category: "Mesas de comedor",
        price: 2_450_000,
        stock: 3,
        description: "Mesa de comedor artesanal fabricada en roble macizo europeo. Cada pieza es única, con vetas naturales que cuentan una historia. Acabado con aceites naturales que resaltan la belleza de la madera.",
        materials: &["Roble macizo europeo", "Acabado con aceite natural"],
        dimensions: "200 x 100 x 76 cm",
        image: "dining-table.svg",
    },
    ProductSeed {
        id: "libreria-nordica",
        title: "Librería Nórdica",
        category: "Estanterías",
        price: 1_890_000,
        stock: 5,
        description: "Librería de diseño escandinavo con líneas limpias y funcionalidad excepcional. Fabricada en fresno con detalles en latón envejecido.",
        materials: &["Fresno macizo", "Detalles en latón"],
        dimensions: "180 x 35 x 200 cm",
        image: "bookshelf.svg",
    },
    ProductSeed {
        id: "silla-copenhagen",
        title: "Silla Copenhagen",
        category: "Sillas",
        price: 485_000,
        stock: 12,
        description: "Silla de diseño danés con respaldo ergonómico tallado a mano. Comodidad y elegancia en perfecta armonía.",
        materials: &["Haya maciza", "Asiento tapizado en lino"],
        dimensions: "45 x 50 x 82 cm",
        image: "chair.svg",
    },
    ProductSeed {
        id: "mesita-cerezo",
        title: "Mesita Cerezo",
        category: "Dormitorio",
        price: 695_000,
        stock: 8,
        description: "Mesa de noche en cerezo con cajón silencioso y acabado satinado. El complemento perfecto para tu dormitorio.",
        materials: &["Cerezo americano", "Herrajes de bronce"],
        dimensions: "50 x 40 x 55 cm",
        image: "nightstand.svg",
    },
    ProductSeed {
        id: "mesa-centro-nogal",
        title: "Mesa Centro Nogal",
        category: "Mesas de centro",
        price: 1_250_000,
        stock: 4,
        description: "Mesa de centro con diseño orgánico inspirado en formas naturales. Las patas curvadas evocan las raíces de un árbol ancestral.",
        materials: &["Nogal americano", "Acabado natural"],
        dimensions: "120 x 80 x 40 cm",
        image: "coffee-table.svg",
    },
    ProductSeed {
        id: "escritorio-ejecutivo",
        title: "Escritorio Ejecutivo",
        category: "Oficina",
        price: 2_180_000,
        stock: 2,
        description: "Escritorio de líneas mid-century con amplios cajones y espacio de trabajo generoso. Diseñado para la productividad y el estilo.",
        materials: &["Roble europeo", "Cajones con guías metálicas"],
        dimensions: "140 x 70 x 76 cm",
        image: "desk.svg",
    },
    ProductSeed {
        id: "banco-jardin",
        title: "Banco Jardín Artesanal",
        category: "Exterior",
        price: 890_000,
        stock: 6,
        description: "Banco de exterior con tratamiento especial para resistir la intemperie. Incluye cojín de lino natural.",
        materials: &["Teca birmana", "Cojín de lino impermeable"],
        dimensions: "150 x 55 x 90 cm",
        image: "bench.svg",
    },
    ProductSeed {
        id: "vitrina-clasica",
        title: "Vitrina Clásica",
        category: "Almacenaje",
        price: 3_450_000,
        stock: 1,
        description: "Vitrina de inspiración victoriana con puertas de vidrio biselado. Una pieza de museo para tu hogar.",
        materials: &["Cerezo oscuro", "Vidrio biselado", "Herrajes de hierro forjado"],
        dimensions: "120 x 45 x 200 cm",
        image: "cabinet.svg",
    },
    ProductSeed {
        id: "espejo-circular",
        title: "Espejo Circular Teca",
        category: "Decoración",
        price: 520_000,
        stock: 10,
        description: "Marco de espejo circular tallado en teca con vetas naturales visibles. Cada espejo es una obra de arte única.",
        materials: &["Teca natural", "Espejo de alta definición"],
        dimensions: "Ø 80 cm",
        image: "mirror.svg",
    },
    ProductSeed {
        id: "perchero-pared",
        title: "Perchero de Pared",
        category: "Recibidor",
        price: 285_000,
        stock: 15,
        description: "Perchero minimalista con ganchos de latón macizo sobre base de arce. Funcionalidad y diseño en armonía.",
        materials: &["Arce canadiense", "Ganchos de latón"],
        dimensions: "80 x 10 x 15 cm",
        image: "coat-rack.svg",
    },
    ProductSeed {
        id: "aparador-escandinavo",
        title: "Aparador Escandinavo",
        category: "Salón",
        price: 2_890_000,
        stock: 3,
        description: "Aparador de líneas puras con puertas correderas y patas anguladas. El corazón de tu salón escandinavo.",
        materials: &["Fresno blanqueado", "Interior en roble"],
        dimensions: "180 x 45 x 80 cm",
        image: "sideboard.svg",
    },
    ProductSeed {
        id: "sillon-cuero",
        title: "Sillón Cuero Artesanal",
        category: "Sillones",
        price: 1_750_000,
        stock: 4,
        description: "Sillón con estructura de nogal y cojines de cuero italiano curtido al vegetal. Comodidad atemporal.",
        materials: &["Nogal americano", "Cuero italiano"],
        dimensions: "75 x 80 x 85 cm",
        image: "armchair.svg",
    },
    ProductSeed {
        id: "estante-plantas",
        title: "Estante para Plantas",
        category: "Decoración",
        price: 345_000,
        stock: 20,
        description: "Soporte para plantas de tres niveles inspirado en el minimalismo japonés. Perfecto para crear tu rincón verde.",
        materials: &["Bambú natural", "Ensambles tradicionales"],
        dimensions: "40 x 30 x 90 cm",
        image: "plant-stand.svg",
    },
    ProductSeed {
        id: "cama-rustica",
        title: "Cama Rústica King",
        category: "Dormitorio",
        price: 3_980_000,
        stock: 2,
        description: "Cama king size con cabecero de tablones macizos. Cada nudo y veta cuenta la historia del bosque.",
        materials: &["Pino añejo recuperado", "Acabado mate natural"],
        dimensions: "200 x 180 x 120 cm",
        image: "bed.svg",
    },
];

/// All products, in declaration order.
pub fn products() -> Vec<Product> {
    SEEDS.iter().map(Product::from).collect()
}
