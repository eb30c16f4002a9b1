//! AT command literals and expected answer tokens for the SIM800L.

// Link check
pub(crate) const AT: &str = "AT";

// Signal strength
pub(crate) const CSQ: &str = "AT+CSQ";

// Power mode
pub(crate) const CFUN_QUERY: &str = "AT+CFUN?";
pub(crate) const CFUN_MINIMUM: &str = "AT+CFUN=0";
pub(crate) const CFUN_NORMAL: &str = "AT+CFUN=1";
pub(crate) const CFUN_SLEEP: &str = "AT+CFUN=4";

// Network registration
pub(crate) const CREG_QUERY: &str = "AT+CREG?";

// GPRS bearer
pub(crate) const SAPBR_CONTYPE_GPRS: &str = "AT+SAPBR=3,1,\"Contype\",\"GPRS\"";
pub(crate) const SAPBR_APN: &str = "AT+SAPBR=3,1,\"APN\",";
pub(crate) const SAPBR_OPEN: &str = "AT+SAPBR=1,1";
pub(crate) const SAPBR_CLOSE: &str = "AT+SAPBR=0,1";

// HTTP session
pub(crate) const HTTP_INIT: &str = "AT+HTTPINIT";
pub(crate) const HTTP_PARA_CID: &str = "AT+HTTPPARA=\"CID\",1";
pub(crate) const HTTP_PARA_URL: &str = "AT+HTTPPARA=\"URL\",";
pub(crate) const HTTP_PARA_CONTENT: &str = "AT+HTTPPARA=\"CONTENT\",";
pub(crate) const HTTP_SSL_ENABLE: &str = "AT+HTTPSSL=1";
pub(crate) const HTTP_SSL_DISABLE: &str = "AT+HTTPSSL=0";
pub(crate) const HTTP_ACTION_GET: &str = "AT+HTTPACTION=0";
pub(crate) const HTTP_ACTION_POST: &str = "AT+HTTPACTION=1";
pub(crate) const HTTP_READ: &str = "AT+HTTPREAD";
pub(crate) const HTTP_TERM: &str = "AT+HTTPTERM";

// Answer tokens
pub(crate) const RSP_OK: &str = "OK";
pub(crate) const RSP_ERROR: &str = "ERROR";
pub(crate) const RSP_DOWNLOAD: &str = "DOWNLOAD";
pub(crate) const RSP_HTTP_READ: &str = "+HTTPREAD: ";

// Markers inside status answers
pub(crate) const CFUN_MARKER: &str = "+CFUN: ";
pub(crate) const CREG_MARKER: &str = "+CREG: ";
pub(crate) const ACTION_GET_MARKER: &str = "+HTTPACTION: 0,";
pub(crate) const ACTION_POST_MARKER: &str = "+HTTPACTION: 1,";

// URL scheme selecting SSL
pub(crate) const HTTPS_SCHEME: &str = "https://";
